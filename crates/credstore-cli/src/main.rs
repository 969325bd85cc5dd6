use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credstore_core::{HashParams, Store};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

mod paths;

/// Exit code for "verify" when the password does not match.
const EXIT_NO_MATCH: u8 = 1;
/// Exit code for any operational failure.
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "credstore")]
#[command(version, about = "Local credential store backed by salted PBKDF2 hashes", long_about = None)]
struct Cli {
    /// Path to the SQLite database (default: CREDSTORE_DB or the platform
    /// data directory)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or replace a credential
    Add {
        username: String,
        /// Prompted without echo when omitted
        password: Option<String>,
    },
    /// Check a password against the stored hash
    Verify {
        username: String,
        /// Prompted without echo when omitted
        password: Option<String>,
    },
    /// Print stored usernames, one per line, alphabetical
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli, HashParams::default()).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(cli: Cli, params: HashParams) -> Result<u8> {
    let db_path = match cli.database {
        Some(path) => path,
        None => paths::database_path()?,
    };
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let store = Store::open(&db_path, params)
        .await
        .with_context(|| format!("opening credential store at {}", db_path.display()))?;
    info!(database = %db_path.display(), "credential store ready");

    match cli.command {
        Commands::Add { username, password } => {
            let password = read_password(password)?;
            store.add(&username, &password).await?;
            println!("credential for '{username}' stored");
            Ok(0)
        }
        Commands::Verify { username, password } => {
            let password = read_password(password)?;
            if store.verify(&username, &password).await? {
                println!("password valid");
                Ok(0)
            } else {
                println!("password invalid or unknown user");
                Ok(EXIT_NO_MATCH)
            }
        }
        Commands::List => {
            for username in store.list().await? {
                println!("{username}");
            }
            Ok(0)
        }
    }
}

/// Take the password from argv when given, otherwise prompt without echo so
/// plaintext need not enter shell history. Zeroized on drop either way.
fn read_password(arg: Option<String>) -> Result<Zeroizing<String>> {
    match arg {
        Some(password) => Ok(Zeroizing::new(password)),
        None => {
            let password =
                rpassword::prompt_password("Password: ").context("reading password from tty")?;
            Ok(Zeroizing::new(password))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_verify_parse_with_inline_password() {
        let cli = Cli::try_parse_from(["credstore", "add", "alice", "s3cr3t"]).unwrap();
        match cli.command {
            Commands::Add { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password.as_deref(), Some("s3cr3t"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["credstore", "verify", "alice"]).unwrap();
        match cli.command {
            Commands::Verify { username, password } => {
                assert_eq!(username, "alice");
                assert!(password.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_takes_no_positional_arguments() {
        assert!(Cli::try_parse_from(["credstore", "list", "extra"]).is_err());
    }

    #[test]
    fn unknown_commands_are_usage_errors() {
        assert!(Cli::try_parse_from(["credstore", "delete", "alice"]).is_err());
        assert!(Cli::try_parse_from(["credstore"]).is_err());
    }

    #[test]
    fn database_flag_is_accepted_in_any_position() {
        let cli = Cli::try_parse_from(["credstore", "list", "--database", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/x.db")));
    }

    #[tokio::test]
    async fn exit_codes_follow_the_contract() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("creds.db").display().to_string();
        let params = HashParams { iterations: 1_000 };
        let args = |rest: &[&str]| {
            let mut v = vec!["credstore", "--database", db.as_str()];
            v.extend_from_slice(rest);
            Cli::try_parse_from(v).unwrap()
        };

        assert_eq!(run(args(&["add", "alice", "s3cr3t"]), params).await.unwrap(), 0);
        assert_eq!(run(args(&["verify", "alice", "s3cr3t"]), params).await.unwrap(), 0);
        assert_eq!(
            run(args(&["verify", "alice", "wrong"]), params).await.unwrap(),
            EXIT_NO_MATCH
        );
        assert_eq!(
            run(args(&["verify", "bob", "anything"]), params).await.unwrap(),
            EXIT_NO_MATCH
        );
        assert_eq!(run(args(&["list"]), params).await.unwrap(), 0);
        assert!(run(args(&["add", "alice", ""]), params).await.is_err());
    }
}
