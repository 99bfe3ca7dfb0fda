use anyhow::{Context, Result};
use mountpoint_core::RendererConfig;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user, then project, then `explicit` if given)
    pub fn load(explicit: Option<&Path>) -> Result<RendererConfig> {
        if let Some(path) = explicit
            && !path.exists()
        {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let user = Self::user_config_path();
        let project = Self::project_config_path();
        let mut layers = vec![user.as_path(), project.as_path()];
        layers.extend(explicit);

        RendererConfig::load_layers(layers).context("Failed to load configuration")
    }

    /// User config path (`$XDG_CONFIG_HOME/mountpoint/config.toml`)
    pub fn user_config_path() -> PathBuf {
        mountpoint_paths::user_config_file()
    }

    /// Project config path
    /// Can be overridden with MOUNTPOINT_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        mountpoint_paths::project_config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mountpoint_core::ActivationPolicy;
    use serial_test::serial;
    use tempfile::TempDir;

    struct IsolatedDirs {
        user: TempDir,
        project: TempDir,
    }

    impl IsolatedDirs {
        fn new() -> Self {
            let dirs = Self {
                user: TempDir::new().unwrap(),
                project: TempDir::new().unwrap(),
            };
            unsafe {
                std::env::set_var("XDG_CONFIG_HOME", dirs.user.path());
                std::env::set_var(mountpoint_paths::PROJECT_CONFIG_DIR_ENV, dirs.project.path());
            }
            dirs
        }

        fn write_user(&self, contents: &str) {
            let dir = self.user.path().join("mountpoint");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("config.toml"), contents).unwrap();
        }

        fn write_project(&self, contents: &str) {
            std::fs::write(self.project.path().join("config.toml"), contents).unwrap();
        }
    }

    impl Drop for IsolatedDirs {
        fn drop(&mut self) {
            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
                std::env::remove_var(mountpoint_paths::PROJECT_CONFIG_DIR_ENV);
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_without_files_uses_defaults() {
        let _dirs = IsolatedDirs::new();
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config, RendererConfig::default());
    }

    #[test]
    #[serial]
    fn test_project_overrides_user() {
        let dirs = IsolatedDirs::new();
        dirs.write_user("[container]\nmarker = \"user-root\"\non_duplicate_activation = \"stack\"\n");
        dirs.write_project("[container]\nmarker = \"project-root\"\n");

        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.container.marker, "project-root");
        assert_eq!(
            config.container.on_duplicate_activation,
            ActivationPolicy::Stack
        );
    }

    #[test]
    #[serial]
    fn test_explicit_file_wins() {
        let dirs = IsolatedDirs::new();
        dirs.write_project("[stylesheet]\nstylesheet_suffix = \".scss\"\n");
        let explicit = dirs.project.path().join("explicit.toml");
        std::fs::write(&explicit, "[stylesheet]\nstylesheet_suffix = \".less\"\n").unwrap();

        let config = ConfigLoader::load(Some(&explicit)).unwrap();
        assert_eq!(config.stylesheet.stylesheet_suffix, ".less");
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_error() {
        let dirs = IsolatedDirs::new();
        let missing = dirs.project.path().join("missing.toml");
        assert!(ConfigLoader::load(Some(&missing)).is_err());
    }

    #[test]
    #[serial]
    fn test_paths_follow_environment() {
        let dirs = IsolatedDirs::new();
        assert_eq!(
            ConfigLoader::user_config_path(),
            dirs.user.path().join("mountpoint/config.toml")
        );
        assert_eq!(
            ConfigLoader::project_config_path(),
            dirs.project.path().join("config.toml")
        );
    }
}
