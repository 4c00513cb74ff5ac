//! Configuration schema.

use serde::{Deserialize, Serialize};

use crate::backend::{LocalConfig, RemoteConfig};
use crate::logger::{Fields, Level};

/// Root logging configuration.
///
/// ```toml
/// level = "info"
///
/// [common_fields]
/// service = "billing"
///
/// [local]
/// encoding = "json"
///
/// [remote]
/// project_id = "my-project"
/// log_id = "billing"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Initial level gate.
    pub level: Level,

    /// Fields attached to every structured call.
    pub common_fields: Fields,

    /// Local backend; absent means disabled.
    pub local: Option<LocalConfig>,

    /// Remote backend; absent means disabled.
    pub remote: Option<RemoteConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_null_logger() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::Debug);
        assert!(config.local.is_none());
        assert!(config.remote.is_none());
        assert!(config.common_fields.is_empty());
    }
}
