//! Monitored resource descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Platform kind plus labels, attached to every remote entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonitoredResource {
    /// Resource type, e.g. "gae_app" or "cloud_run_revision".
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl MonitoredResource {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}
