use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub seed_sample: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Local .env is optional
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Self::resolve(&settings, |key| env::var(key).ok())
    }

    /// Plain deployment variables (`DATA_DIR`, `PORT`, ...) win over file values.
    fn resolve(
        settings: &config::Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let value = |var: &str, key: &str| lookup(var).or_else(|| settings.get_string(key).ok());

        let data_dir = value("DATA_DIR", "storage.data_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let database_path = value("DATABASE_PATH", "storage.database_path")
            .unwrap_or_else(|| data_dir.join("sparky.db").to_string_lossy().into_owned());

        let host = value("HOST", "server.host").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match value("PORT", "server.port") {
            Some(raw) => raw
                .parse()
                .map_err(|_| config::ConfigError::Message(format!("invalid port {}", raw)))?,
            None => 3000,
        };

        let seed_sample = value("SEED_SAMPLE", "storage.seed_sample")
            .map(|v| v != "0" && v != "false")
            .unwrap_or(true);

        Ok(Config {
            data_dir,
            database_path,
            host,
            port,
            seed_sample,
        })
    }

    /// Configuration for an ephemeral store, used by tests and demos.
    pub fn in_memory() -> Self {
        Config {
            data_dir: env::temp_dir(),
            database_path: IN_MEMORY_DATABASE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            seed_sample: false,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_config_binds_loopback() {
        let config = Config::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.bind_address(), "127.0.0.1:0");
        assert!(!config.seed_sample);
    }

    fn dev_settings() -> config::Config {
        config::Config::builder()
            .add_source(config::File::with_name("config/dev"))
            .build()
            .unwrap()
    }

    #[test]
    fn deployment_variables_override_dev_file() {
        let config = Config::resolve(&dev_settings(), |key| match key {
            "DATA_DIR" => Some("/srv/sparky".to_string()),
            "PORT" => Some("8080".to_string()),
            "SEED_SAMPLE" => Some("false".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/sparky"));
        assert_eq!(config.database_path, "/srv/sparky/sparky.db");
        assert_eq!(config.port, 8080);
        assert!(!config.seed_sample);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn dev_file_applies_without_variables() {
        let config = Config::resolve(&dev_settings(), |_| None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.port, 3000);
        assert!(config.seed_sample);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = Config::resolve(&dev_settings(), |key| {
            (key == "PORT").then(|| "http".to_string())
        });
        assert!(result.is_err());
    }
}
