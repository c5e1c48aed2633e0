use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Raw bubble configuration tree.
///
/// Keys are addressed with dotted paths (`bubble.sets.13.mid_px`). Height buckets are plain
/// mapping keys, so YAML documents may write them as integers; they are stringified on load.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleConfig(Value);

impl Default for BubbleConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl BubbleConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| Error::InvalidConfigYaml {
                message: e.to_string(),
            })?;
        Self::from_root(yaml_to_json(yaml))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfigJson {
            message: e.to_string(),
        })?;
        Self::from_root(value)
    }

    /// Loads a config file; `.json` is parsed as JSON, everything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    fn from_root(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(Self(value)),
            // An empty YAML document is a valid "use all defaults" config.
            Value::Null => Ok(Self::empty_object()),
            other => Err(Error::ConfigRootNotMapping {
                found: value_kind(&other),
            }),
        }
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_i64(&self, dotted_path: &str) -> Option<i64> {
        self.get(dotted_path)?.as_i64()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    /// Returns true when the path exists and holds a mapping.
    pub fn is_section(&self, dotted_path: &str) -> bool {
        self.get(dotted_path).is_some_and(Value::is_object)
    }

    pub fn section(&self, dotted_path: &str) -> Option<&Map<String, Value>> {
        self.get(dotted_path)?.as_object()
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Tagged(t) => yaml_key_to_string(t.value),
        serde_yaml::Value::Null | serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            None
        }
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                let Some(key) = yaml_key_to_string(k) else {
                    tracing::warn!("ignoring bubble config entry with a non-scalar key");
                    continue;
                };
                out.insert(key, yaml_to_json(v));
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(t) => yaml_to_json(t.value),
    }
}
