use super::value::{FieldKind, FieldValue, Record};
use serde::Serialize;
use std::collections::BTreeMap;

/// Append-only store of the fields contributed during one pipeline run
///
/// Every name maps to the sequence of values contributed under it, in the
/// order the stages ran. Reads never fail: absent names yield empty
/// sequences and entries of the wrong type read as the zero value.
///
/// # Example
/// ```
/// use streelity::pipeline::{FieldStore, Record};
///
/// let mut store = FieldStore::new();
/// store.append_record(Record::new().with("X", "a"));
/// store.append_record(Record::new().with("X", "b").with("Id", 7));
///
/// assert_eq!(store.strings("X"), vec!["a", "b"]);
/// assert_eq!(store.first_int("Id"), 7);
/// assert_eq!(store.first_int("missing"), 0);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FieldStore {
    data: BTreeMap<String, Vec<FieldValue>>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single value under `name`
    pub fn append(&mut self, name: impl Into<String>, value: FieldValue) {
        self.data.entry(name.into()).or_default().push(value);
    }

    /// Append every pair of a record, preserving its order
    pub fn append_record(&mut self, record: Record) -> usize {
        let count = record.len();
        for (name, value) in record {
            self.append(name, value);
        }
        count
    }

    /// Raw values stored under `name`
    pub fn values(&self, name: &str) -> &[FieldValue] {
        self.data.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Type tag of the first entry under `name`
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.values(name).first().map(FieldValue::kind)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    /// Total number of stored entries across all names
    pub fn len(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn strings(&self, name: &str) -> Vec<String> {
        self.values(name)
            .iter()
            .map(|v| v.as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn ints(&self, name: &str) -> Vec<i64> {
        self.values(name)
            .iter()
            .map(|v| v.as_int().unwrap_or_default())
            .collect()
    }

    pub fn floats(&self, name: &str) -> Vec<f64> {
        self.values(name)
            .iter()
            .map(|v| v.as_float().unwrap_or_default())
            .collect()
    }

    pub fn first_string(&self, name: &str) -> String {
        self.try_string(name).unwrap_or_default()
    }

    pub fn first_int(&self, name: &str) -> i64 {
        self.try_int(name).unwrap_or_default()
    }

    pub fn first_float(&self, name: &str) -> f64 {
        self.try_float(name).unwrap_or_default()
    }

    /// First value under `name`, only if present and stored as a string
    pub fn try_string(&self, name: &str) -> Option<String> {
        self.values(name)
            .first()
            .and_then(FieldValue::as_str)
            .map(str::to_string)
    }

    pub fn try_int(&self, name: &str) -> Option<i64> {
        self.values(name).first().and_then(FieldValue::as_int)
    }

    pub fn try_float(&self, name: &str) -> Option<f64> {
        self.values(name).first().and_then(FieldValue::as_float)
    }

    /// JSON object of `name -> [values]`, for diagnostics
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
