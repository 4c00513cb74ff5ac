//! Environment variable probing.

use std::collections::HashMap;

use crate::error::{LoggingError, LoggingResult};

/// Source of environment variables.
pub trait EnvSource {
    /// Value of `name`, treating empty values as unset.
    fn get(&self, name: &str) -> Option<String>;

    /// Value of `name`, or `MissingEnvVar(name)`.
    fn require(&self, name: &str) -> LoggingResult<String> {
        self.get(name)
            .ok_or_else(|| LoggingError::MissingEnvVar(name.to_string()))
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).filter(|v| !v.is_empty()).cloned()
    }
}

impl<const N: usize> EnvSource for [(&str, &str); N] {
    fn get(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(k, v)| *k == name && !v.is_empty())
            .map(|(_, v)| v.to_string())
    }
}
