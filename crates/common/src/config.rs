use crate::errors::{ConfigError, ConfigResult, ValidationError};
use crate::structured_logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info, Level};

pub const ENV_PREFIX: &str = "SLMS_";

/// Конфигурация инструментов администрирования SLMS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlmsConfig {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Файл SQLite; `None` означает `<slms home>/menu.db`
    pub path: Option<PathBuf>,
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl SlmsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.database.pool_size == 0 {
            return Err(ValidationError::invalid(
                "database.pool_size",
                "must be at least 1",
            ));
        }
        Level::from_str(&self.logging.level).map_err(|_| {
            ValidationError::invalid(
                "logging.level",
                format!("unknown level '{}'", self.logging.level),
            )
        })?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database.path.clone().unwrap_or_else(default_db_path)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: Level::from_str(&self.logging.level).unwrap_or(Level::WARN),
            json_output: self.logging.json,
            ..LoggingConfig::default()
        }
    }
}

/// Каталог данных: `$SLMS_HOME` или `~/.slms`
pub fn slms_home() -> PathBuf {
    if let Ok(custom) = env::var("SLMS_HOME") {
        let p = PathBuf::from(custom);
        std::fs::create_dir_all(&p).ok();
        return p;
    }
    let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push(".slms");
    std::fs::create_dir_all(&dir).ok();
    dir
}

pub fn default_db_path() -> PathBuf {
    slms_home().join("menu.db")
}

pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            config_paths: Self::default_config_paths(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Файл из командной строки, он обязан существовать
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    /// Заменить список путей поиска (тесты так не подхватывают файлы пользователя)
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("slms.toml"), PathBuf::from(".slmsrc.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("slms").join("config.toml"));
            paths.push(config_dir.join("slms").join("config.json"));
        }

        paths
    }

    pub async fn load(&self) -> ConfigResult<SlmsConfig> {
        let mut config = match &self.explicit_path {
            Some(path) => {
                let config = Self::load_file(path).await?;
                info!("Loaded configuration from: {}", path.display());
                config
            }
            None => self.load_first_found().await?,
        };

        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    async fn load_first_found(&self) -> ConfigResult<SlmsConfig> {
        for path in &self.config_paths {
            if path.exists() {
                let config = Self::load_file(path).await?;
                info!("Loaded configuration from: {}", path.display());
                return Ok(config);
            }
        }
        debug!("No configuration file found, using defaults");
        Ok(SlmsConfig::default())
    }

    async fn load_file(path: &Path) -> ConfigResult<SlmsConfig> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;

        let parse_err = |reason: String| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        };

        match path.extension().and_then(|ext| ext.to_str()).unwrap_or("") {
            "json" => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string())),
            _ => toml::from_str(&content).map_err(|e| parse_err(e.to_string())),
        }
    }

    fn apply_env_overrides(&self, config: &mut SlmsConfig) -> ConfigResult<()> {
        if let Ok(path) = env::var(format!("{}DB_PATH", self.env_prefix)) {
            config.database.path = Some(PathBuf::from(path));
        }

        if let Ok(size) = env::var(format!("{}POOL_SIZE", self.env_prefix)) {
            config.database.pool_size = size.parse().map_err(|_| {
                ValidationError::invalid(
                    format!("{}POOL_SIZE", self.env_prefix),
                    format!("'{size}' is not a number"),
                )
            })?;
        }

        if let Ok(level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
            config.logging.level = level;
        }

        if let Ok(json) = env::var(format!("{}LOG_JSON", self.env_prefix)) {
            config.logging.json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        Ok(())
    }
}
