//! Server configuration from environment variables.
//!
//! | Variable            | Default          | Meaning                               |
//! |---------------------|------------------|---------------------------------------|
//! | `GTFS_DIR`          | unset            | Feed directory; unset serves no data  |
//! | `BIND_ADDR`         | `127.0.0.1:3000` | Listen address                        |
//! | `AGENCY_NAME`       | `DART`           | Agency name used in response text     |
//! | `FEED_REFRESH_SECS` | `0`              | Periodic reload interval; `0` is off  |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
#[error("invalid {var}: {value:?} ({reason})")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// GTFS feed directory. `None` runs the server without schedule data.
    pub gtfs_dir: Option<PathBuf>,

    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Agency name shown in response text.
    pub agency_name: String,

    /// How often to reload the feed. `None` disables periodic reloads.
    pub refresh_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gtfs_dir: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            agency_name: "DART".to_string(),
            refresh_interval: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("GTFS_DIR") {
            config.gtfs_dir = Some(PathBuf::from(dir));
        }

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError {
                var: "BIND_ADDR",
                value: addr.clone(),
                reason: format!("{e}"),
            })?;
        }

        if let Some(agency) = get("AGENCY_NAME") {
            config.agency_name = agency.trim().to_string();
        }

        if let Some(secs) = get("FEED_REFRESH_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError {
                var: "FEED_REFRESH_SECS",
                value: secs.clone(),
                reason: format!("{e}"),
            })?;
            config.refresh_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}
