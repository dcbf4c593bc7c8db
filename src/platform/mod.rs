// Dishbook platform paths
// Linux:   $XDG_CONFIG_HOME/dishbook, $XDG_DATA_HOME/dishbook
// macOS:   ~/Library/Application Support/Dishbook
// Windows: %APPDATA%/Dishbook

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DISHBOOK_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific configuration directory.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("Dishbook")
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Dishbook")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("dishbook"),
            Err(_) => home_dir().join(".config").join("dishbook"),
        }
    }
}

/// Returns the directory holding the database.
///
/// `DISHBOOK_DATA_DIR` takes precedence over the platform default.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "windows")]
    {
        get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("dishbook"),
            Err(_) => home_dir().join(".local").join("share").join("dishbook"),
        }
    }
}
