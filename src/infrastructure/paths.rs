//! Path utilities for the Zellij sandbox environment.
//!
//! The host filesystem is mounted under `/host`, which points to the cwd of
//! the last focused terminal (or where Zellij was started). That is usually
//! the user's home directory.

use std::path::PathBuf;

/// Returns the data directory, `/host/.local/share/zellij/hanzi-cards`.
///
/// Holds the worker's storage file and the log file.
///
/// # Examples
///
/// ```
/// use hanzi_cards::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/hanzi-cards");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("hanzi-cards")
}

/// JSON file the worker persists characters to.
#[must_use]
pub fn storage_file() -> PathBuf {
    get_data_dir().join("characters.json")
}

/// Log file written by the tracing subscriber.
#[must_use]
pub fn log_file() -> PathBuf {
    get_data_dir().join("hanzi-cards.log")
}

/// Expands tilde paths to use the `/host` prefix for the Zellij sandbox.
///
/// # Examples
///
/// ```
/// use hanzi_cards::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/mine.toml"), "/host/themes/mine.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_data_dir() {
        assert_eq!(storage_file().parent(), Some(get_data_dir().as_path()));
        assert!(log_file().ends_with("hanzi-cards.log"));
    }

    #[test]
    fn expand_tilde_only_touches_leading_tilde() {
        assert_eq!(expand_tilde("~user/file"), "~user/file");
        assert_eq!(expand_tilde("relative/~/x"), "relative/~/x");
    }
}
