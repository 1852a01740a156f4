//! Override values and ordered override lists

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};

/// A single override value as written in a config file or on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl ParameterValue {
    /// Numeric view of the value; booleans have none.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Bool(_) => None,
            Self::Integer(i) => Some(i as f64),
            Self::Float(f) => Some(f),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl FromStr for ParameterValue {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => return Ok(Self::Bool(true)),
            "false" | "no" | "off" => return Ok(Self::Bool(false)),
            _ => {}
        }

        if let Ok(i) = s.parse::<i64>() {
            return Ok(Self::Integer(i));
        }

        s.parse::<f64>()
            .map(Self::Float)
            .map_err(|_| ParamsError::value(s))
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Ordered list of user overrides, keyed by free-form names.
///
/// Names are not validated here; unknown names survive until
/// [`crate::resolve`], which warns about and drops them. When the same name
/// appears twice the later entry wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ParameterValue>",
    into = "BTreeMap<String, ParameterValue>"
)]
pub struct ParameterOverrides {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override, builder style
    pub fn set<K: Into<String>, V: Into<ParameterValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Append an override
    pub fn insert<K: Into<String>, V: Into<ParameterValue>>(&mut self, key: K, value: V) {
        self.entries.push((key.into(), value.into()));
    }

    /// Parse a `KEY=VALUE` assignment, e.g. `pitch_floor=70`.
    pub fn parse_assignment(assignment: &str) -> Result<(String, ParameterValue)> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| ParamsError::assignment(assignment))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ParamsError::assignment(assignment));
        }

        Ok((key.to_string(), value.parse()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> FromIterator<(K, V)> for ParameterOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        overrides.extend(iter);
        overrides
    }
}

impl<K: Into<String>, V: Into<ParameterValue>> Extend<(K, V)> for ParameterOverrides {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl From<BTreeMap<String, ParameterValue>> for ParameterOverrides {
    fn from(map: BTreeMap<String, ParameterValue>) -> Self {
        map.into_iter().collect()
    }
}

impl From<ParameterOverrides> for BTreeMap<String, ParameterValue> {
    fn from(overrides: ParameterOverrides) -> Self {
        overrides.entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_kinds() {
        assert_eq!("true".parse::<ParameterValue>(), Ok(ParameterValue::Bool(true)));
        assert_eq!("No".parse::<ParameterValue>(), Ok(ParameterValue::Bool(false)));
        assert_eq!("15".parse::<ParameterValue>(), Ok(ParameterValue::Integer(15)));
        assert_eq!("0.01".parse::<ParameterValue>(), Ok(ParameterValue::Float(0.01)));
        assert!("abc".parse::<ParameterValue>().is_err());
    }

    #[test]
    fn test_parse_assignment() {
        let (key, value) = ParameterOverrides::parse_assignment("pitch_floor=70").unwrap();
        assert_eq!(key, "pitch_floor");
        assert_eq!(value, ParameterValue::Integer(70));

        let (key, value) = ParameterOverrides::parse_assignment(" very_accurate = yes ").unwrap();
        assert_eq!(key, "very_accurate");
        assert_eq!(value, ParameterValue::Bool(true));
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        assert!(matches!(
            ParameterOverrides::parse_assignment("pitch_floor"),
            Err(ParamsError::InvalidAssignment(_))
        ));
        assert!(matches!(
            ParameterOverrides::parse_assignment("=70"),
            Err(ParamsError::InvalidAssignment(_))
        ));
        assert!(matches!(
            ParameterOverrides::parse_assignment("pitch_floor=low"),
            Err(ParamsError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let overrides = ParameterOverrides::new()
            .set("pitch_floor", 100)
            .set("foo", true)
            .set("pitch_floor", 120.5);

        let keys: Vec<&str> = overrides.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["pitch_floor", "foo", "pitch_floor"]);
    }

    #[test]
    fn test_deserialize_from_toml_table() {
        let overrides: ParameterOverrides = toml::from_str(
            r#"
            time_step = 0.01
            max_candidates = 10
            very_accurate = true
            "#,
        )
        .unwrap();

        let entries: Vec<(&str, ParameterValue)> = overrides.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("max_candidates", ParameterValue::Integer(10)),
                ("time_step", ParameterValue::Float(0.01)),
                ("very_accurate", ParameterValue::Bool(true)),
            ]
        );
    }
}
