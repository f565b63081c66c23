//! Layered configuration loading
//!
//! Sources, lowest priority first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml`
//! 3. `local.toml`
//! 4. `CATEGORY_*` environment variables

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "CATEGORY_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "CATEGORY_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "CATEGORY";

/// `CATEGORY_DATABASE__URL` -> `database.url`
const ENV_SEPARATOR: &str = "__";

#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// When set, layered loading is skipped
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `CATEGORY_CONFIG_DIR`, `CATEGORY_CONFIG_FILE` and
    /// `CATEGORY_APP_ENV`.
    ///
    /// # Errors
    ///
    /// `CATEGORY_CONFIG_DIR` and `CATEGORY_CONFIG_FILE` are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_from_env = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && dir_from_env.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "CATEGORY_CONFIG_DIR and CATEGORY_CONFIG_FILE cannot both be set. \
                 Use CATEGORY_CONFIG_DIR for layered configuration or \
                 CATEGORY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: dir_from_env
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load a single file instead of the layered directory.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment read from `CATEGORY_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate settings from all sources
    ///
    /// # Errors
    ///
    /// - `default.toml` is missing (layered mode) or the single file is missing
    /// - a source fails to parse or deserialize
    /// - the merged settings fail validation
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings: Settings = self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match &self.config_file {
            Some(config_file) => add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        add_env_source(builder).build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = add_file_source(builder, &self.config_dir.join("default.toml"), true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = add_file_source(builder, &env_path, false)?;

        add_file_source(builder, &self.config_dir.join("local.toml"), false)
    }
}

fn add_file_source(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if required && !path.exists() {
        return Err(ConfigError::file_not_found(format!(
            "Required configuration file not found: {}",
            path.display()
        )));
    }

    let name = path.to_str().ok_or_else(|| {
        ConfigError::ParseError(format!(
            "Configuration path is not valid UTF-8: {}",
            path.display()
        ))
    })?;

    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
}

fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator(ENV_SEPARATOR)
            .ignore_empty(true)
            .try_parsing(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Loader tests mutate process-wide environment variables
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const BASE: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
url = "postgres://localhost/categories"

[jwt]
secret = "0123456789abcdef0123456789abcdef"
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched variables on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for key in [
                CONFIG_DIR_ENV,
                CONFIG_FILE_ENV,
                AppEnvironment::ENV_VAR,
                "CATEGORY_SERVER__PORT",
                "CATEGORY_JWT__SECRET",
            ] {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_new_defaults() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_dir_and_file_are_exclusive() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/etc/category");
        env.set(CONFIG_FILE_ENV, "/etc/category/service.toml");

        let err = ConfigLoader::new().unwrap_err();
        assert!(matches!(err, ConfigError::MutualExclusivityError(msg) if msg.contains("CATEGORY_CONFIG_FILE")));
    }

    #[test]
    fn test_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());

        let err = ConfigLoader::new().unwrap().load().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(msg) if msg.contains("default.toml")));
    }

    #[test]
    fn test_full_precedence_chain() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let dir = setup_config_dir(&[
            ("default.toml", BASE),
            (
                "production.toml",
                "[server]\nport = 8080\nhost = \"0.0.0.0\"\n[database]\nmax_connections = 40\n",
            ),
            ("local.toml", "[server]\nport = 9090\n"),
        ]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");
        env.set("CATEGORY_JWT__SECRET", "fedcba9876543210fedcba9876543210");

        let settings = ConfigLoader::new().unwrap().load().unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.database.max_connections, 40);
        assert_eq!(settings.database.url, "postgres://localhost/categories");
        assert_eq!(settings.jwt.secret, "fedcba9876543210fedcba9876543210");
    }

    #[test]
    fn test_with_environment_overrides_env_var() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let dir = setup_config_dir(&[("default.toml", BASE), ("test.toml", "[server]\nport = 4000\n")]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Test)
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 4000);
    }

    #[test]
    fn test_single_file_mode_with_env_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let dir = setup_config_dir(&[("service.toml", BASE)]);
        env.set("CATEGORY_SERVER__PORT", "5000");

        let settings = ConfigLoader::new()
            .unwrap()
            .with_file(dir.path().join("service.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.database.url, "postgres://localhost/categories");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let dir = setup_config_dir(&[("default.toml", "[database]\nurl = \"postgres://x/y\"\n")]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());

        let err = ConfigLoader::new().unwrap().load().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { field, .. } if field == "jwt.secret"));
    }
}
