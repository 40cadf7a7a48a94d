//! Azure Credential - credential normalization for Azure monitoring datasources
//!
//! Translates a datasource's persisted settings into the typed
//! [`Credentials`] used at query time, and back again when a user edits
//! credentials in a settings editor.
//!
//! # Features
//!
//! - **One model for every scheme** - managed identity, workload identity,
//!   client secret (plain and on-behalf-of), client certificate, password,
//!   and delegated current-user credentials with an optional service identity
//! - **Concealed secrets** - once stored, a secret is represented by a
//!   marker and never returned to the editor in plaintext
//! - **Legacy migration** - secrets stored under deprecated keys are still
//!   read, and the first save through the new model retires the old shape
//! - **Capability gating** - schemes disabled by the host fall back silently
//!   on read and are refused on write
//!
//! # Example
//!
//! ```
//! use azure_credential::prelude::*;
//!
//! let ctx = AuthContext::new(AzureAuthSettings {
//!     managed_identity_enabled: true,
//!     ..AzureAuthSettings::default()
//! });
//!
//! let settings = apply(&DataSourceSettings::default(), &Credentials::Msi, &ctx).unwrap();
//! assert_eq!(resolve(&settings, &ctx).unwrap(), Some(Credentials::Msi));
//! ```
#![forbid(unsafe_code)]

/// Azure clouds and the default-cloud lookup
pub mod clouds;
/// Capability settings and call context
pub mod config;
/// Errors and secret primitives
pub mod core;
/// Live credentials model
pub mod credentials;
/// Credential reader
pub mod reader;
/// Field-level secret access
pub mod secrets;
/// Persisted settings record
pub mod settings;
/// Credential writer
pub mod writer;

// ── Root re-exports ─────────────────────────────────────────────────────────

pub use crate::clouds::{AzureCloudInfo, CloudResolver, FixedCloud, PredefinedClouds, azure_clouds};
pub use crate::config::{AuthContext, AzureAuthSettings};
pub use crate::core::{CredentialError, Result, SecretString};
pub use crate::credentials::{
    AdPasswordCredentials, AuthType, CertificateFormat, ClientCertificateCredentials,
    ClientSecretCredentials, ConcealedSecret, Credentials, CurrentUserCredentials, SecretValue,
};
pub use crate::reader::resolve;
pub use crate::settings::{
    CredentialsRecord, DataSourceSettings, JsonData, SecureJsonData, SecureJsonFields,
    has_credentials,
};
pub use crate::writer::apply;

/// Commonly used types and functions
pub mod prelude {
    pub use crate::config::{AuthContext, AzureAuthSettings};
    pub use crate::core::{CredentialError, SecretString};
    pub use crate::credentials::{
        AdPasswordCredentials, AuthType, CertificateFormat, ClientCertificateCredentials,
        ClientSecretCredentials, ConcealedSecret, Credentials, CurrentUserCredentials,
        SecretValue,
    };
    pub use crate::reader::resolve;
    pub use crate::settings::{DataSourceSettings, has_credentials};
    pub use crate::writer::apply;
}
