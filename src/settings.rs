use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

use crate::entities::image::UploadPolicy;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_database_type")]
    pub database_type: String,

    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,

    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Media-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_database_type() -> String {
    "sqlite".to_string()
}
fn default_database_path() -> String {
    "./data.db".to_string()
}
fn default_upload_dir() -> String {
    "./uploads".to_string()
}
fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024
}
fn default_allowed_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".gif", ".webp"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_shutdown_timeout() -> u64 {
    5
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_extensions")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_path.trim().is_empty() {
            errors.push("DATABASE_PATH cannot be empty");
        }
        if !self.database_type.eq_ignore_ascii_case("sqlite") {
            errors.push("DATABASE_TYPE must be sqlite");
        }
        if self.upload_dir.trim().is_empty() {
            errors.push("UPLOAD_DIR cannot be empty");
        }
        if self.max_upload_size == 0 {
            errors.push("MAX_UPLOAD_SIZE must be greater than zero");
        }
        if self.allowed_extensions.is_empty() {
            errors.push("ALLOWED_EXTENSIONS cannot be empty");
        }
        if self.allowed_extensions.iter().any(|ext| !ext.starts_with('.') || ext.len() < 2) {
            errors.push("ALLOWED_EXTENSIONS entries must look like .ext");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_size: self.max_upload_size,
            allowed_extensions: self.allowed_extensions.clone(),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Media-API".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_type: default_database_type(),
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
            allowed_extensions: default_allowed_extensions(),
            cors_allowed_origins: default_cors_origins(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(base_config().validate().is_ok());
        assert_eq!(default_max_upload_size(), 10_485_760);
        assert_eq!(default_allowed_extensions(), vec![".jpg", ".jpeg", ".png", ".gif", ".webp"]);
    }

    #[test]
    fn rejects_unsupported_database_type() {
        let config = AppConfig { database_type: "mysql".into(), ..base_config() };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("DATABASE_TYPE"));
    }

    #[test]
    fn rejects_extensions_without_leading_dot() {
        let config = AppConfig { allowed_extensions: vec!["png".into()], ..base_config() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_wildcard_cors_in_production() {
        let config = AppConfig { env: AppEnvironment::Production, ..base_config() };
        assert!(config.validate().is_err());

        let config = AppConfig {
            env: AppEnvironment::Production,
            cors_allowed_origins: vec!["https://example.com".into()],
            ..base_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cors_origins_split_comma_lists() {
        let config = AppConfig {
            cors_allowed_origins: vec!["https://a.dev, https://b.dev".into(), " ".into()],
            ..base_config()
        };
        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev"]);
    }

    #[test]
    fn upload_policy_mirrors_config() {
        let config = AppConfig { max_upload_size: 42, ..base_config() };
        let policy = config.upload_policy();
        assert_eq!(policy.max_size, 42);
        assert_eq!(policy.allowed_extensions, default_allowed_extensions());
    }
}
