//! Secure side-channel maps of a datasource settings record

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::SecretString;

/// Write-only map of secrets being newly set
///
/// Holds plaintext on its way to the host's secure store. `Debug` redacts
/// every value; `Serialize` exposes them, since the serialized record is
/// what the host persists. Keys this crate does not manage are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecureJsonData(BTreeMap<String, SecretString>);

impl SecureJsonData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SecretString) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<SecretString> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<SecretString>> FromIterator<(K, V)> for SecureJsonData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for SecureJsonData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            value.expose_secret(|plain| map.serialize_entry(key, plain))?;
        }
        map.end()
    }
}

// `null` entries mean "nothing pending" and are dropped.
impl<'de> Deserialize<'de> for SecureJsonData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<SecretString>>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value)))
                .collect(),
        ))
    }
}

/// Read-only map of secret keys already stored server-side
///
/// `true` means the value is concealed and must not be re-sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecureJsonFields(BTreeMap<String, bool>);

impl SecureJsonFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is flagged as stored; unknown keys are not
    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    pub fn set(&mut self, key: impl Into<String>, concealed: bool) {
        self.0.insert(key.into(), concealed);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for SecureJsonFields {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_json_data_serializes_plaintext() {
        let data: SecureJsonData = [("azureClientSecret", "s3cret")].into_iter().collect();
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"azureClientSecret":"s3cret"}"#);
    }

    #[test]
    fn test_secure_json_data_debug_is_redacted() {
        let data: SecureJsonData = [("password", "hunter2")].into_iter().collect();
        let debug = format!("{data:?}");
        assert!(debug.contains("password"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_secure_json_data_drops_null_entries() {
        let data: SecureJsonData =
            serde_json::from_str(r#"{"azureClientSecret":null,"basicAuthPassword":"pw"}"#)
                .unwrap();
        assert!(!data.contains_key("azureClientSecret"));
        assert_eq!(data.get("basicAuthPassword"), Some(&SecretString::new("pw")));
    }

    #[test]
    fn test_secure_json_fields_unknown_key_is_unset() {
        let fields: SecureJsonFields = [("password", true)].into_iter().collect();
        assert!(fields.is_set("password"));
        assert!(!fields.is_set("privateKey"));
        assert_eq!(fields.get("privateKey"), None);
    }
}
