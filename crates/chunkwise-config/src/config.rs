//! Top-level configuration and build-mode profiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dev::DevConfig;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::output::OutputConfig;
use crate::partition::PartitionConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkwiseConfig {
    #[serde(default)]
    pub partition: PartitionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub dev: DevConfig,

    /// Section overrides per build mode, applied by [`ChunkwiseConfig::materialize_profile`].
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub partition: Value,

    #[serde(default)]
    pub output: Value,

    #[serde(default)]
    pub dev: Value,
}

impl ChunkwiseConfig {
    /// Create from a JSON value, e.g. the `chunkwise` field of `package.json`.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkwise_config::ChunkwiseConfig;
    /// use serde_json::json;
    ///
    /// let config = ChunkwiseConfig::from_value(json!({
    ///     "output": { "base": "/assets/" },
    ///     "dev": { "port": 4000 }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.output.base, "/assets/");
    /// assert_eq!(config.dev.port, 4000);
    /// assert_eq!(config.dev.host, "0.0.0.0");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::invalid_value("config", e))
    }

    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::invalid_value("config", e))
    }

    /// Apply the overrides of profile `mode`, if one is defined.
    ///
    /// Objects merge key by key; arrays and scalars replace.
    pub fn materialize_profile(mut self, mode: Option<&str>) -> ConfigResult<Self> {
        let Some(name) = mode else {
            return Ok(self);
        };
        let Some(profile) = self.profiles.get(name).cloned() else {
            tracing::debug!(mode = name, "no profile for mode");
            return Ok(self);
        };

        self.partition = apply_override(&self.partition, &profile.partition)?;
        self.output = apply_override(&self.output, &profile.output)?;
        self.dev = apply_override(&self.dev, &profile.dev)?;
        tracing::debug!(mode = name, "applied profile overrides");

        Ok(self)
    }

    /// Validate every section without touching the filesystem.
    pub fn validate(&self) -> ConfigResult<()> {
        crate::validation::validate_schema(self)
    }
}

fn apply_override<T>(section: &T, overrides: &Value) -> ConfigResult<T>
where
    T: Serialize + serde::de::DeserializeOwned + Clone,
{
    if overrides.is_null() {
        return Ok(section.clone());
    }

    let mut base = serde_json::to_value(section).map_err(|err| {
        ConfigError::InvalidProfileOverride {
            message: err.to_string(),
        }
    })?;
    merge_values(&mut base, overrides);
    serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_fills_defaults() {
        let config = ChunkwiseConfig::from_value(json!({})).unwrap();
        assert_eq!(config, ChunkwiseConfig::default());
    }

    #[test]
    fn from_value_reports_bad_types() {
        let err = ChunkwiseConfig::from_value(json!({ "dev": { "port": "soon" } })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn profile_merging_works() {
        let value = json!({
            "output": { "hash_length": 8 },
            "dev": { "port": 3000 },
            "profiles": {
                "production": {
                    "output": { "hash_length": 12, "base": "https://cdn.example.com/dist/" }
                },
                "development": {
                    "dev": { "port": 3100 }
                }
            }
        });

        let config = ChunkwiseConfig::from_value(value.clone())
            .unwrap()
            .materialize_profile(Some("production"))
            .unwrap();
        assert_eq!(config.output.hash_length, 12);
        assert_eq!(config.output.base, "https://cdn.example.com/dist/");
        assert_eq!(config.dev.port, 3000);

        let config = ChunkwiseConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("development"))
            .unwrap();
        assert_eq!(config.output.hash_length, 8);
        assert_eq!(config.dev.port, 3100);
    }

    #[test]
    fn unknown_mode_is_a_no_op() {
        let config = ChunkwiseConfig::default();
        let same = config.clone().materialize_profile(Some("staging")).unwrap();
        assert_eq!(config, same);
    }

    #[test]
    fn profile_arrays_replace() {
        let value = json!({
            "profiles": {
                "lean": { "partition": { "charting": ["chart.js"] } }
            }
        });
        let config = ChunkwiseConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("lean"))
            .unwrap();
        assert_eq!(config.partition.charting, vec!["chart.js".to_string()]);
        assert_eq!(config.partition.calendar, vec!["@fullcalendar/*".to_string()]);
    }

    #[test]
    fn bad_profile_override_is_reported() {
        let value = json!({
            "profiles": { "broken": { "dev": { "port": -1 } } }
        });
        let err = ChunkwiseConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("broken"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProfileOverride { .. }));
    }
}
