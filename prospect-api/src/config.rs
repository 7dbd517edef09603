use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    pub auth: Option<AuthConfig>,
    pub database: Option<DatabaseConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            server: Some(ServerConfig::default()),
            auth: Some(AuthConfig::default()),
            database: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    /// Shared dashboard password. Unset means every login fails with a server error.
    pub master_password: Option<String>,
    /// Mark the session cookie `Secure` (enable behind HTTPS)
    #[serde(default)]
    pub secure_cookie: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8080

[auth]
# Shared password for the dashboard; MASTER_PASSWORD in the environment overrides it
# master_password = "change-me"
secure_cookie = false

[database]
# path = "/path/to/contacts.db"
"#;

impl ApiConfig {
    /// Load from `path`, or from the default location, writing a default file
    /// there on first run. `PROSPECT_*` environment variables override file
    /// values (e.g. `PROSPECT_SERVER__PORT=9000`).
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(Environment::with_prefix("PROSPECT").separator("__"))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;
        config.apply_master_password(std::env::var("MASTER_PASSWORD").ok());

        Ok((config, config_path))
    }

    fn apply_master_password(&mut self, password: Option<String>) {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.auth.get_or_insert_with(AuthConfig::default).master_password = Some(password);
        }
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn auth(&self) -> AuthConfig {
        self.auth.clone().unwrap_or_default()
    }

    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        match self.database.as_ref().and_then(|db| db.path.as_ref()) {
            Some(path) => Ok(PathBuf::from(path)),
            None => crate::helpers::database::get_db_path(),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("prospect-tracker").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_reads_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api.toml");

        let (config, loaded_from) = ApiConfig::load(Some(&path)).unwrap();

        assert!(path.exists());
        assert_eq!(loaded_from, path);
        assert_eq!(config.server().port, 8080);
        assert!(!config.auth().secure_cookie);
    }

    #[test]
    fn test_reads_custom_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9001

[auth]
master_password = "hunter2"
secure_cookie = true

[database]
path = "/tmp/prospects.db"
"#,
        )
        .unwrap();

        let (config, _) = ApiConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server().host, "0.0.0.0");
        assert_eq!(config.server().port, 9001);
        assert!(config.auth().secure_cookie);
        assert_eq!(
            config.db_path().unwrap(),
            PathBuf::from("/tmp/prospects.db")
        );
    }

    #[test]
    fn test_master_password_override() {
        let mut config = ApiConfig::default();
        assert!(config.auth().master_password.is_none());

        config.apply_master_password(Some(String::new()));
        assert!(config.auth().master_password.is_none());

        config.apply_master_password(Some("from-env".to_string()));
        assert_eq!(config.auth().master_password.as_deref(), Some("from-env"));
    }
}
