//! Runtime configuration: `.env` file, optional TOML file, env overrides.
//!
//! Precedence, lowest to highest: built-in defaults, config file, process
//! environment. CLI flags are applied on top by `main`.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

const DEFAULT_CONFIG_LOCATIONS: &[&str] = &["roads.toml", "config/roads.toml"];

/// Fully composed runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Where the composed values came from, for startup logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub env_file_loaded: bool,
    pub config_path: Option<PathBuf>,
}

/// Shape of the optional TOML file; every section and key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: FileServerConfig,
    #[serde(default)]
    database: FileDatabaseConfig,
    #[serde(default)]
    cors: FileCorsConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileServerConfig {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct FileDatabaseConfig {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileCorsConfig {
    allowed_origins: Option<Vec<String>>,
}

/// Raw values gathered from the process environment.
#[derive(Debug, Default)]
struct EnvConfig {
    config_path: Option<PathBuf>,
    database_url: Option<String>,
    host: Option<String>,
    port: Option<String>,
    cors_origins: Option<String>,
}

impl EnvConfig {
    fn gather() -> Self {
        Self {
            config_path: std::env::var("ROADS_CONFIG").ok().map(PathBuf::from),
            database_url: std::env::var("DATABASE_URL").ok(),
            host: std::env::var("SERVER_HOST").ok(),
            port: std::env::var("SERVER_PORT").ok(),
            cors_origins: std::env::var("CORS_ORIGINS").ok(),
        }
    }
}

/// A non-fatal configuration problem worth surfacing at startup.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, message: impl Into<String>, hint: Option<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint,
        });
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file {path} does not exist")]
    MissingConfig { path: PathBuf },

    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path)
                .map(|_| true)
                .or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?,
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        let env = EnvConfig::gather();
        let (file, config_path) = self.load_file_config(&env)?;

        let (config, warnings) =
            compose_config(file, env, config_path, env_file_loaded);

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        // Explicit paths must exist; discovered defaults may be absent.
        let (path, explicit) = if let Some(path) = &self.options.config_path {
            (Some(path.clone()), true)
        } else if let Some(path) = &env.config_path {
            (Some(path.clone()), true)
        } else {
            let discovered = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(Path::new)
                .find(|candidate| candidate.exists())
                .map(Path::to_path_buf);
            (discovered, false)
        };

        let Some(path) = path else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file: FileConfig = toml::from_str(&contents).map_err(|err| {
            ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            }
        })?;

        Ok((Some(file), Some(path)))
    }
}

fn compose_config(
    file: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> (Config, ConfigWarnings) {
    let mut warnings = ConfigWarnings::default();
    let file = file.unwrap_or_default();

    let host = env
        .host
        .or(file.server.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = match env.port.as_deref() {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                warnings.push(
                    format!("SERVER_PORT `{raw}` is not a valid port"),
                    Some("falling back to the config file / default".into()),
                );
                None
            }
        },
        None => None,
    };
    let port = port.or(file.server.port).unwrap_or(DEFAULT_PORT);

    let url = env.database_url.or(file.database.url);
    if url.is_none() {
        warnings.push(
            "no database URL configured",
            Some("set DATABASE_URL or [database].url in roads.toml".into()),
        );
    }

    let allowed_origins = match env.cors_origins {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect(),
        None => file
            .cors
            .allowed_origins
            .unwrap_or_else(|| vec!["*".to_string()]),
    };

    let config = Config {
        server: ServerConfig { host, port },
        database: DatabaseConfig { url },
        cors: CorsConfig { allowed_origins },
        metadata: ConfigMetadata {
            env_file_loaded,
            config_path,
        },
    };

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        let (config, warnings) =
            compose_config(None, EnvConfig::default(), None, false);

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.database.url.is_none());
        assert!(config.cors.allows_any());
        // Missing database URL is a warning, not an error.
        assert!(!warnings.is_empty());
    }

    #[test]
    fn env_overrides_file_values() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://file/roads"
            "#,
        )
        .unwrap();
        let env = EnvConfig {
            port: Some("9000".to_string()),
            database_url: Some("postgres://env/roads".to_string()),
            ..EnvConfig::default()
        };

        let (config, warnings) = compose_config(Some(file), env, None, false);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://env/roads")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn bad_env_port_warns_and_falls_back() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            port = 8080
            [database]
            url = "postgres://file/roads"
            "#,
        )
        .unwrap();
        let env = EnvConfig {
            port: Some("not-a-port".to_string()),
            ..EnvConfig::default()
        };

        let (config, warnings) = compose_config(Some(file), env, None, false);

        assert_eq!(config.server.port, 8080);
        assert_eq!(warnings.items.len(), 1);
    }

    #[test]
    fn cors_origins_parse_from_comma_list() {
        let env = EnvConfig {
            cors_origins: Some(
                "https://roads.meru.go.ke, https://staging.meru.go.ke"
                    .to_string(),
            ),
            database_url: Some("postgres://env/roads".to_string()),
            ..EnvConfig::default()
        };

        let (config, _) = compose_config(None, env, None, false);

        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert!(!config.cors.allows_any());
    }
}
