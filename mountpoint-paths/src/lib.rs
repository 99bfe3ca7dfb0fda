//! XDG Base Directory paths for mountpoint.
//!
//! User configuration lives under the XDG config directory rather than the
//! platform-native location, so the same path works on every platform.

use std::path::PathBuf;

/// Environment variable overriding the project config directory
pub const PROJECT_CONFIG_DIR_ENV: &str = "MOUNTPOINT_PROJECT_CONFIG_DIR";

/// Name of the config file inside a config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the mountpoint config directory.
///
/// Returns `$XDG_CONFIG_HOME/mountpoint` if set, otherwise `~/.config/mountpoint`.
///
/// # Examples
///
/// ```
/// use mountpoint_paths::config_dir;
///
/// let config = config_dir();
/// assert!(config.ends_with("mountpoint"));
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("mountpoint")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/mountpoint")
    } else {
        PathBuf::from(".config/mountpoint")
    }
}

/// User-level config file
pub fn user_config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Project-level config file.
///
/// `.mountpoint/config.toml` relative to the working directory, unless
/// `MOUNTPOINT_PROJECT_CONFIG_DIR` points somewhere else.
pub fn project_config_file() -> PathBuf {
    match std::env::var(PROJECT_CONFIG_DIR_ENV) {
        Ok(dir) => PathBuf::from(dir).join(CONFIG_FILE_NAME),
        Err(_) => PathBuf::from(".mountpoint").join(CONFIG_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_ends_with_mountpoint() {
        let path = config_dir();
        assert!(
            path.ends_with("mountpoint"),
            "config_dir should end with 'mountpoint'"
        );
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_env() {
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/test-config");
        }
        assert_eq!(config_dir(), PathBuf::from("/tmp/test-config/mountpoint"));
        assert_eq!(
            user_config_file(),
            PathBuf::from("/tmp/test-config/mountpoint/config.toml")
        );
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_project_config_file_default() {
        unsafe {
            std::env::remove_var(PROJECT_CONFIG_DIR_ENV);
        }
        assert_eq!(
            project_config_file(),
            PathBuf::from(".mountpoint/config.toml")
        );
    }

    #[test]
    #[serial]
    fn test_project_config_file_env_override() {
        unsafe {
            std::env::set_var(PROJECT_CONFIG_DIR_ENV, "/tmp/proj");
        }
        assert_eq!(project_config_file(), PathBuf::from("/tmp/proj/config.toml"));
        unsafe {
            std::env::remove_var(PROJECT_CONFIG_DIR_ENV);
        }
    }
}
