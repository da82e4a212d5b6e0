use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub enforcement: EnforcementConfig,
    pub sweep: SweepConfig,
    pub listing: ListingConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
    pub data_file: String,
    pub backup_file: String,
    pub expired_export_file: String,
    pub enable_expired_export: bool,
}

impl StorageConfig {
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.base_dir.join(&self.data_file)
    }

    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        self.base_dir.join(&self.backup_file)
    }

    #[must_use]
    pub fn expired_export_path(&self) -> PathBuf {
        self.base_dir.join(&self.expired_export_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementConfig {
    pub blacklist_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api_token: SecretString,
}

impl Serialize for AdminConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AdminConfig", 1)?;
        state.serialize_field("api_token", REDACTED)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for AdminConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct AdminConfigHelper {
            api_token: String,
        }

        let helper = AdminConfigHelper::deserialize(deserializer)?;
        Ok(AdminConfig {
            api_token: SecretString::from(helper.api_token),
        })
    }
}

impl AdminConfig {
    #[must_use]
    pub fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data/bans"),
            data_file: "BansData.txt".to_string(),
            backup_file: "BansData_bk.txt".to_string(),
            expired_export_file: "BansData_Expired.txt".to_string(),
            enable_expired_export: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origin: None,
            },
            storage: StorageConfig::default(),
            enforcement: EnforcementConfig {
                blacklist_file: PathBuf::from("data/bans/Blacklist.txt"),
            },
            sweep: SweepConfig {
                enabled: true,
                interval_secs: 60,
            },
            listing: ListingConfig {
                default_page_size: 5,
                max_page_size: 100,
            },
            admin: AdminConfig {
                api_token: SecretString::from(""),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.storage.base_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError {
                message: "storage base_dir cannot be empty".to_string(),
            });
        }

        if self.storage.data_file.trim().is_empty()
            || self.storage.backup_file.trim().is_empty()
            || self.storage.expired_export_file.trim().is_empty()
        {
            return Err(AppError::ConfigError {
                message: "storage file names cannot be empty".to_string(),
            });
        }

        if self.storage.data_file == self.storage.backup_file
            || self.storage.data_file == self.storage.expired_export_file
        {
            return Err(AppError::ConfigError {
                message: "data_file must differ from backup_file and expired_export_file"
                    .to_string(),
            });
        }

        if self.enforcement.blacklist_file.as_os_str().is_empty() {
            return Err(AppError::ConfigError {
                message: "enforcement blacklist_file cannot be empty".to_string(),
            });
        }

        if self.enforcement.blacklist_file == self.storage.data_path() {
            return Err(AppError::ConfigError {
                message: "blacklist_file cannot be the ban data file".to_string(),
            });
        }

        if self.sweep.enabled && self.sweep.interval_secs == 0 {
            return Err(AppError::ConfigError {
                message: "sweep interval_secs must be greater than 0".to_string(),
            });
        }

        if self.listing.max_page_size == 0 {
            return Err(AppError::ConfigError {
                message: "max_page_size must be greater than 0".to_string(),
            });
        }

        if self.listing.default_page_size == 0
            || self.listing.default_page_size > self.listing.max_page_size
        {
            return Err(AppError::ConfigError {
                message: "default_page_size must be between 1 and max_page_size".to_string(),
            });
        }

        // Serialized defaults carry the redaction marker, never a usable token.
        let token = self.admin.api_token().trim();
        if token.is_empty() || token == REDACTED {
            return Err(AppError::ConfigError {
                message: "admin api_token must be configured".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
