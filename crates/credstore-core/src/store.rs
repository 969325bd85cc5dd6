//! Store: open/add/verify/list over the `credentials` table.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use tracing::{debug, info};

use credstore_crypto::{
    constant_time_eq, derive_hash, generate_salt, DEFAULT_ITERATIONS, HASH_LEN, SALT_LEN,
};

use crate::error::StoreError;
use crate::record::HashRow;

/// Bound on lock-wait when another process holds the write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Work-factor configuration for new writes. Passed explicitly into
/// [`Store::open`] rather than read from ambient process state, so tests
/// and concurrent call sites can pin their own value. Existing records keep
/// the iteration count they were written with.
#[derive(Debug, Clone, Copy)]
pub struct HashParams {
    pub iterations: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Central store handle. Cheap to clone (pool is Arc internally).
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    params: HashParams,
}

impl Store {
    /// Open (or create) the SQLite database at `db_path` and run pending
    /// migrations. Idempotent: reopening an existing store is a no-op beyond
    /// the migration check.
    pub async fn open(db_path: &Path, params: HashParams) -> Result<Self, StoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(opts).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Integrity(e.to_string()))?;

        debug!(path = %db_path.display(), "credential store open");
        Ok(Self { pool, params })
    }

    /// Create or fully replace the credential for `username`.
    ///
    /// Every call writes a fresh salt, a hash derived at the store's
    /// configured iteration count, and a new `updated_at`; `created_at`
    /// survives replacement. The upsert runs in a transaction, so a crash
    /// mid-write leaves the prior record untouched.
    pub async fn add(&self, username: &str, password: &str) -> Result<(), StoreError> {
        if username.is_empty() {
            return Err(StoreError::Validation("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(StoreError::Validation("password must not be empty".into()));
        }

        let salt = generate_salt();
        let hash = derive_hash(password.as_bytes(), &salt, self.params.iterations);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO credentials (username, salt, hash, iterations, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(username) DO UPDATE SET \
                 salt = excluded.salt, \
                 hash = excluded.hash, \
                 iterations = excluded.iterations, \
                 updated_at = excluded.updated_at",
        )
        .bind(username)
        .bind(salt.as_slice())
        .bind(hash.as_slice())
        .bind(i64::from(self.params.iterations))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(username, "credential stored");
        Ok(())
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// Returns `false` for both "unknown user" and "wrong password" — the
    /// two cases are not distinguishable by return value, and the unknown
    /// path burns the same derivation cost as a real comparison so they are
    /// not distinguishable by timing either.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let row: Option<HashRow> =
            sqlx::query_as("SELECT salt, hash, iterations FROM credentials WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let matched = match row {
            Some(row) => {
                let iterations = u32::try_from(row.iterations).map_err(|_| {
                    StoreError::Integrity(format!(
                        "stored iteration count out of range: {}",
                        row.iterations
                    ))
                })?;
                let computed = derive_hash(password.as_bytes(), &row.salt, iterations);
                constant_time_eq(&computed, &row.hash)
            }
            None => {
                let computed =
                    derive_hash(password.as_bytes(), &[0u8; SALT_LEN], self.params.iterations);
                constant_time_eq(&computed, &[0u8; HASH_LEN])
            }
        };

        debug!(username, matched, "verification complete");
        Ok(matched)
    }

    /// Usernames only, alphabetical. Salts, hashes and iteration counts
    /// never leave the store.
    pub async fn list(&self) -> Result<Vec<String>, StoreError> {
        let usernames = sqlx::query_scalar("SELECT username FROM credentials ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(usernames)
    }

    /// Close the connection pool. Dropping the store also releases it; this
    /// exists so tests and short-lived callers can flush deterministically.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
