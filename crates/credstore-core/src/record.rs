//! Database row models — map to/from the `credentials` table.
//!
//! Crate-private: salt and hash bytes never leave the store. `list` exposes
//! usernames only.

/// Verification projection of a credential row. The timestamp columns are
/// audit metadata and never participate in hashing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct HashRow {
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
    /// PBKDF2 work factor this row's hash was derived with.
    pub iterations: i64,
}
