use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application-level constants
pub const APP_NAME: &str = "Careline";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the bind address.
pub const HOST_ENV: &str = "CARELINE_HOST";
/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "CARELINE_PORT";

pub const DEFAULT_PORT: u16 = 8080;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "careline_lib=info,careline=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid IP address: {value}")]
    InvalidHost { var: &'static str, value: String },
    #[error("{var} is not a valid port: {value}")]
    InvalidPort { var: &'static str, value: String },
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for variable values. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(HOST_ENV).filter(|v| !v.trim().is_empty()) {
            config.host = value.trim().parse().map_err(|_| ConfigError::InvalidHost {
                var: HOST_ENV,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_ENV,
                value: value.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
