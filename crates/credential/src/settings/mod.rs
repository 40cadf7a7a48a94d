//! Persisted datasource settings record
//!
//! The record has three parts:
//! - `jsonData`: plaintext configuration, including the stored
//!   `azureCredentials` object and the legacy top-level auth fields
//! - `secureJsonData`: secrets being newly set (write-only)
//! - `secureJsonFields`: which secret keys are already stored server-side
//!
//! Keys this crate does not own are carried through untouched, so a record
//! decoded and re-encoded here loses nothing the host put in it.
//!
//! ```
//! use azure_credential::{DataSourceSettings, has_credentials};
//!
//! let settings = DataSourceSettings::from_json(
//!     r#"{"jsonData":{"azureCredentials":{"authType":"msi"},"timeout":30}}"#,
//! )
//! .unwrap();
//!
//! assert!(has_credentials(&settings));
//! assert_eq!(settings.json_data.other["timeout"], 30);
//! ```

mod secure;

pub use secure::{SecureJsonData, SecureJsonFields};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::Result;
use crate::credentials::AuthType;

/// Datasource settings as read from and written back to persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceSettings {
    #[serde(default)]
    pub json_data: JsonData,

    #[serde(default, skip_serializing_if = "SecureJsonData::is_empty")]
    pub secure_json_data: SecureJsonData,

    /// Absent on instance settings shipped to query time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_json_fields: Option<SecureJsonFields>,

    /// Remaining top-level fields (id, uid, url, ...)
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl DataSourceSettings {
    /// Settings holding only the given `jsonData`
    pub fn with_json_data(json_data: JsonData) -> Self {
        Self {
            json_data,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encodes the record, secrets in `secureJsonData` included
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Plaintext `jsonData` map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_credentials: Option<CredentialsRecord>,

    /// Forward the caller's OAuth identity to the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_pass_thru: Option<bool>,

    /// Bypass the host's query response cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_grafana_cache: Option<bool>,

    // Legacy credentials, retired on the first write through the new model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl JsonData {
    /// Whether any legacy top-level auth field is still present
    pub fn has_legacy_credentials(&self) -> bool {
        self.azure_auth_type.is_some()
            || self.cloud_name.is_some()
            || self.tenant_id.is_some()
            || self.client_id.is_some()
    }

    pub(crate) fn clear_legacy_credentials(&mut self) {
        self.azure_auth_type = None;
        self.cloud_name = None;
        self.tenant_id = None;
        self.client_id = None;
    }
}

/// Stored `azureCredentials` object
///
/// Only non-secret fields exist here; secrets travel through the secure
/// maps. `auth_type` stays a string so records written by a newer or
/// foreign plugin still decode and are rejected by tag, not by parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRecord {
    pub auth_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_cloud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_credentials_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_credentials: Option<Box<CredentialsRecord>>,
}

impl CredentialsRecord {
    /// Record with only the tag set
    pub fn new(auth_type: AuthType) -> Self {
        Self {
            auth_type: auth_type.as_str().to_owned(),
            ..Self::default()
        }
    }
}

/// Whether the settings carry credentials in the current shape
///
/// Legacy top-level fields alone do not count.
pub fn has_credentials(settings: &DataSourceSettings) -> bool {
    settings.json_data.azure_credentials.is_some()
}
