//! Path resolution for whack directories.
//!
//! XDG-compliant, with a `WHACK_DB` override for the database file.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "whack";
const DB_FILE: &str = "whack.db";

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "WHACK_DB";

/// XDG data directory for whack.
///
/// `$XDG_DATA_HOME/whack`, else `$HOME/.local/share/whack`. Falls back to a
/// relative `.local/share/whack` when neither variable is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".local/share")
        });

    data_home.join(APP_DIR)
}

/// Database file path: `WHACK_DB` if set, else `<data dir>/whack.db`.
pub fn get_db_path() -> PathBuf {
    env::var_os(DB_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| get_data_dir().join(DB_FILE))
}
