//! Error types for credential resolution and updates
//!
//! A single [`CredentialError`] covers both directions:
//! - [`CredentialError::UnsupportedAuthType`]: a stored or nested `authType` tag is not
//!   one the model knows
//! - [`CredentialError::CapabilityDisabled`]: the writer was asked to save a scheme
//!   that is switched off in the host configuration
//! - [`CredentialError::InvalidSettings`] / [`CredentialError::InvalidConfig`]: the
//!   settings record or the capability file could not be decoded
//!
//! The reader never raises `CapabilityDisabled`; it returns `Ok(None)` so a
//! dashboard can fall back to the datasource's default credentials.
//!
//! ```
//! use azure_credential::{AuthType, CredentialError};
//!
//! let err = CredentialError::CapabilityDisabled {
//!     auth_type: AuthType::Msi,
//! };
//! assert_eq!(
//!     err.to_string(),
//!     "Managed Identity authentication is not enabled in Grafana config."
//! );
//! ```

use thiserror::Error;

use crate::credentials::AuthType;

/// Top-level credential error
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The `authType` tag is not recognised
    #[error("The auth type '{auth_type}' is not supported.")]
    UnsupportedAuthType {
        /// Tag as found in the settings
        auth_type: String,
    },

    /// The scheme is disabled by the capability settings
    #[error("{} authentication is not enabled in Grafana config.", .auth_type.display_name())]
    CapabilityDisabled {
        /// Scheme that was rejected
        auth_type: AuthType,
    },

    /// Settings record could not be decoded or encoded
    #[error("Invalid datasource settings: {source}")]
    InvalidSettings {
        /// Underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Capability configuration could not be parsed
    #[error("Invalid Azure auth configuration: {source}")]
    InvalidConfig {
        /// Underlying TOML error
        #[from]
        source: toml::de::Error,
    },
}

impl CredentialError {
    pub(crate) fn unsupported(auth_type: impl Into<String>) -> Self {
        Self::UnsupportedAuthType {
            auth_type: auth_type.into(),
        }
    }
}

/// Result type alias for credential operations
pub type Result<T> = std::result::Result<T, CredentialError>;
