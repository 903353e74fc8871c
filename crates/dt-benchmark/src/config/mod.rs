use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::benchmarking::scoring::{PolicyError, ScoringPolicy};

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
    pub synthesis: SynthesisConfig,
    pub scoring: ScoringPolicy,
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

        let endpoint = env::var("SYNTHESIS_ENDPOINT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let timeout_ms = match env::var("SYNTHESIS_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidTimeout { value: raw })?,
            Err(_) => DEFAULT_SYNTHESIS_TIMEOUT_MS,
        };

        let scoring = match env::var("BENCHMARK_POLICY_PATH") {
            Ok(path) if !path.trim().is_empty() => load_policy(path.trim())?,
            _ => ScoringPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            synthesis: SynthesisConfig {
                endpoint,
                timeout_ms,
            },
            scoring,
        })
    }
}

pub const DEFAULT_SYNTHESIS_TIMEOUT_MS: u64 = 15_000;

/// Reads and validates a JSON scoring policy. Omitted fields keep their defaults.
pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<ScoringPolicy, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyFile {
        path: path.to_path_buf(),
        source,
    })?;
    let policy: ScoringPolicy =
        serde_json::from_str(&contents).map_err(|source| ConfigError::PolicyFormat {
            path: path.to_path_buf(),
            source,
        })?;
    policy.validate().map_err(ConfigError::InvalidPolicy)?;
    Ok(policy)
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the synthesis collaborator lives and how long one call may take.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// `None` runs the service without a collaborator; synthesis then reports unavailable.
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl SynthesisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidTimeout {
        value: String,
    },
    PolicyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    PolicyFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidPolicy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "SYNTHESIS_TIMEOUT_MS must be a positive integer, got '{}'",
                value
            ),
            ConfigError::PolicyFile { path, .. } => {
                write!(f, "unable to read scoring policy {}", path.display())
            }
            ConfigError::PolicyFormat { path, .. } => {
                write!(f, "scoring policy {} is not valid JSON", path.display())
            }
            ConfigError::InvalidPolicy(err) => write!(f, "invalid scoring policy: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::PolicyFile { source, .. } => Some(source),
            ConfigError::PolicyFormat { source, .. } => Some(source),
            ConfigError::InvalidPolicy(err) => Some(err),
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
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("SYNTHESIS_ENDPOINT");
        env::remove_var("SYNTHESIS_TIMEOUT_MS");
        env::remove_var("BENCHMARK_POLICY_PATH");
    }

    fn policy_file(name: &str, contents: &str) -> PathBuf {
        let file_name = format!("dt-benchmark-{}-{}.json", name, std::process::id());
        let path = env::temp_dir().join(file_name);
        std::fs::write(&path, contents).expect("policy file written");
        path
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
        assert_eq!(config.synthesis.endpoint, None);
        assert_eq!(config.synthesis.timeout(), Duration::from_millis(15_000));
        assert_eq!(config.scoring, ScoringPolicy::default());
    }

    #[test]
    fn rejects_zero_synthesis_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SYNTHESIS_TIMEOUT_MS", "0");
        let err = AppConfig::load().expect_err("zero timeout is rejected");
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
        reset_env();
    }

    #[test]
    fn reads_synthesis_endpoint_and_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SYNTHESIS_ENDPOINT", " http://127.0.0.1:9000/synthesize ");
        env::set_var("SYNTHESIS_TIMEOUT_MS", "2500");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.synthesis.endpoint.as_deref(),
            Some("http://127.0.0.1:9000/synthesize")
        );
        assert_eq!(config.synthesis.timeout_ms, 2500);
        reset_env();
    }

    #[test]
    fn loads_partial_policy_file_over_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = policy_file("partial", r#"{"competitive": {"advantage_cap": 3.0}}"#);
        env::set_var("BENCHMARK_POLICY_PATH", &path);

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.competitive.advantage_cap, 3.0);
        assert_eq!(config.scoring.competitive.gap_cap, 2.0);
        assert_eq!(config.scoring.emotional_weights.delight, 4.0);

        reset_env();
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn rejects_policy_with_unordered_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = policy_file(
            "unordered",
            r#"{"pillar_tiers": {"strong": 2.0, "moderate": 3.0}}"#,
        );

        let err = load_policy(&path).expect_err("policy is rejected");
        assert!(matches!(err, ConfigError::InvalidPolicy(_)));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }
}
