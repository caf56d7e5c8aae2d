//! Environment-driven configuration for the reference cache and telemetry.
//!
//! | Variable                  | Effect                                         |
//! |---------------------------|------------------------------------------------|
//! | `CDES_TELEMETRY`          | `0`, `false`, `no`, `off` disable telemetry    |
//! | `CDES_TELEMETRY_ENDPOINT` | endpoint recorded on the telemetry config      |
//! | `CDES_DATA_DIR`           | directory holding `terpene-library.json`       |

use std::env;
use std::path::PathBuf;

pub const ENV_TELEMETRY: &str = "CDES_TELEMETRY";
pub const ENV_TELEMETRY_ENDPOINT: &str = "CDES_TELEMETRY_ENDPOINT";
pub const ENV_DATA_DIR: &str = "CDES_DATA_DIR";

/// Default telemetry collection endpoint.
pub const DEFAULT_TELEMETRY_ENDPOINT: &str = "https://cdes.acidni.net/api/telemetry";

/// Telemetry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_TELEMETRY_ENDPOINT.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Reads `CDES_TELEMETRY` and `CDES_TELEMETRY_ENDPOINT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup(ENV_TELEMETRY).is_none_or(|v| !is_falsy(&v));
        let endpoint = lookup(ENV_TELEMETRY_ENDPOINT)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TELEMETRY_ENDPOINT.to_string());
        Self { enabled, endpoint }
    }

    /// Telemetry that records nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Reference data settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceConfig {
    /// Directory holding the bundled reference files.
    pub data_dir: Option<PathBuf>,
}

impl ReferenceConfig {
    /// Reads `CDES_DATA_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_dir: lookup(ENV_DATA_DIR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}

fn is_falsy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
