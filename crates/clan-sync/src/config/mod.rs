use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::roster::DEFAULT_MAX_CHUNK_LEN;

const DEFAULT_TEMPLE_API_URL: &str = "https://templeosrs.com/api/groupmembers.php";
const DEFAULT_TEMPLE_GROUP_ID: u32 = 1265;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub tracker: TrackerConfig,
    pub delivery: DeliveryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_url =
            env::var("TEMPLE_API_URL").unwrap_or_else(|_| DEFAULT_TEMPLE_API_URL.to_string());
        let group_id = parse_var("TEMPLE_GROUP_ID", DEFAULT_TEMPLE_GROUP_ID)?;
        let snapshot_path = env::var("TEMPLE_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("temple.json"));
        let timeout_secs = parse_var("TEMPLE_TIMEOUT_SECS", 30u64)?;

        let webhook_url = env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let max_chunk_len = parse_var("REPORT_MAX_CHUNK_LEN", DEFAULT_MAX_CHUNK_LEN)?;
        if max_chunk_len == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "REPORT_MAX_CHUNK_LEN",
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            tracker: TrackerConfig {
                api_url,
                group_id,
                snapshot_path,
                timeout: Duration::from_secs(timeout_secs),
            },
            delivery: DeliveryConfig {
                webhook_url,
                max_chunk_len,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the Temple group roster is fetched from and cached on disk.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub api_url: String,
    pub group_id: u32,
    pub snapshot_path: PathBuf,
    pub timeout: Duration,
}

impl TrackerConfig {
    pub fn members_url(&self) -> String {
        format!("{}?id={}", self.api_url, self.group_id)
    }
}

/// Webhook target and message sizing. No webhook means reports are not posted.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub webhook_url: Option<String>,
    pub max_chunk_len: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "TEMPLE_API_URL",
            "TEMPLE_GROUP_ID",
            "TEMPLE_SNAPSHOT_PATH",
            "TEMPLE_TIMEOUT_SECS",
            "DISCORD_WEBHOOK_URL",
            "REPORT_MAX_CHUNK_LEN",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(
            config.tracker.members_url(),
            "https://templeosrs.com/api/groupmembers.php?id=1265"
        );
        assert_eq!(config.tracker.snapshot_path, PathBuf::from("temple.json"));
        assert!(config.delivery.webhook_url.is_none());
        assert_eq!(config.delivery.max_chunk_len, 1500);
    }

    #[test]
    fn blank_webhook_url_disables_delivery() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DISCORD_WEBHOOK_URL", "   ");
        let config = AppConfig::load().expect("config loads");
        assert!(config.delivery.webhook_url.is_none());
        reset_env();
    }

    #[test]
    fn rejects_zero_chunk_length() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REPORT_MAX_CHUNK_LEN", "0");
        let err = AppConfig::load().expect_err("zero chunk length rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                name: "REPORT_MAX_CHUNK_LEN"
            }
        ));
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }
}
