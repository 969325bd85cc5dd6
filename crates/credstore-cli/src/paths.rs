use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_QUALIFIER: &str = "io";
pub const APP_ORG: &str = "credstore";
pub const APP_NAME: &str = "credstore";

pub const DB_FILE_NAME: &str = "credentials.db";

/// Default database path: `CREDSTORE_DB` env override if set, otherwise
/// `credentials.db` under the platform data directory. The `--database`
/// flag takes precedence over both (handled by the caller).
pub fn database_path() -> anyhow::Result<PathBuf> {
    if let Ok(override_path) = std::env::var("CREDSTORE_DB") {
        return Ok(PathBuf::from(override_path));
    }
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("cannot determine data directory"))?;
    Ok(dirs.data_dir().join(DB_FILE_NAME))
}
