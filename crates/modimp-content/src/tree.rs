//! The structured value patched by the merge engine

use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Leaf values of a [`Tree`]
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    String(String),
}

/// A hierarchical configuration value.
///
/// `Absent` means "no value here". It is produced while merging (deletions,
/// sequence padding) and is always removed by [`Tree::finalize`] before a tree
/// is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Map(IndexMap<String, Tree>),
    Sequence(Vec<Tree>),
    Scalar(Scalar),
    Absent,
}

impl Default for Tree {
    fn default() -> Self {
        Self::Absent
    }
}

impl Tree {
    /// An empty map.
    pub fn map() -> Self {
        Self::Map(IndexMap::new())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Look up a key of a map; `None` for any other shape.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Truthiness of marker values: `false`, `0`, `""`, `null`, empty
    /// containers and `Absent` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Map(map) => !map.is_empty(),
            Self::Sequence(items) => !items.is_empty(),
            Self::Scalar(Scalar::Null) => false,
            Self::Scalar(Scalar::Bool(b)) => *b,
            Self::Scalar(Scalar::Integer(n)) => *n != 0,
            Self::Scalar(Scalar::Unsigned(n)) => *n != 0,
            Self::Scalar(Scalar::Float(f)) => *f != 0.0,
            Self::Scalar(Scalar::String(s)) => !s.is_empty(),
            Self::Absent => false,
        }
    }

    /// Recursively remove every `Absent` value.
    ///
    /// Map entries holding `Absent` are dropped and sequences are compacted.
    /// A root that is itself `Absent` stays `Absent`.
    pub fn finalize(self) -> Tree {
        match self {
            Self::Map(map) => Self::Map(
                map.into_iter()
                    .filter(|(_, value)| !value.is_absent())
                    .map(|(key, value)| (key, value.finalize()))
                    .collect(),
            ),
            Self::Sequence(items) => Self::Sequence(
                items
                    .into_iter()
                    .filter(|value| !value.is_absent())
                    .map(Tree::finalize)
                    .collect(),
            ),
            other => other,
        }
    }

    /// Whether any `Absent` remains anywhere in the tree.
    pub fn contains_absent(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Map(map) => map.values().any(Tree::contains_absent),
            Self::Sequence(items) => items.iter().any(Tree::contains_absent),
            Self::Scalar(_) => false,
        }
    }

    /// Convert to a JSON value. `Absent` has no JSON form and yields `None`;
    /// nested `Absent` values are skipped.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Map(map) => Some(Value::Object(
                map.iter()
                    .filter_map(|(k, v)| v.to_json().map(|v| (k.clone(), v)))
                    .collect(),
            )),
            Self::Sequence(items) => {
                Some(Value::Array(items.iter().filter_map(Tree::to_json).collect()))
            }
            Self::Scalar(Scalar::Null) => Some(Value::Null),
            Self::Scalar(Scalar::Bool(b)) => Some(Value::Bool(*b)),
            Self::Scalar(Scalar::Integer(n)) => Some(Value::Number((*n).into())),
            Self::Scalar(Scalar::Unsigned(n)) => Some(Value::Number((*n).into())),
            Self::Scalar(Scalar::Float(f)) => {
                Some(Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null))
            }
            Self::Scalar(Scalar::String(s)) => Some(Value::String(s.clone())),
        }
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Scalar(Scalar::Integer(i)),
                (None, Some(u)) => Self::Scalar(Scalar::Unsigned(u)),
                (None, None) => Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(0.0))),
            },
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Tree::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Tree::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Tree {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Tree {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<i64> for Tree {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<i32> for Tree {
    fn from(value: i32) -> Self {
        Self::Scalar(Scalar::Integer(value.into()))
    }
}

impl From<f64> for Tree {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for Tree {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl FromIterator<(String, Tree)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Tree)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}

impl FromIterator<Tree> for Tree {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().collect())
    }
}
