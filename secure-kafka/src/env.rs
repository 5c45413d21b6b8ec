//! Environment snapshot for configuration building.
//!
//! Configuration builders take an explicit snapshot of environment variables
//! instead of reading ambient process state, so building a config is a pure
//! function of the snapshot and trivially testable.

use std::collections::BTreeMap;
use std::env;

/// An immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    /// Look up a variable by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_collected_values() {
        let env: EnvSnapshot = [("SASL_USERNAME", "svc-user")].into_iter().collect();

        assert_eq!(env.get("SASL_USERNAME"), Some("svc-user"));
        assert_eq!(env.get("SASL_PASSWORD"), None);
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        let env = EnvSnapshot::default();
        assert_eq!(env.get("BOOTSTRAP_SERVERS"), None);
    }
}
