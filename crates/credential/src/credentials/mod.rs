//! Live credentials model
//!
//! [`Credentials`] is the authoritative value a datasource uses at query
//! time and the value a settings editor hands back on save. Exactly one
//! scheme is active; fields of other schemes cannot be represented.
//!
//! ```
//! use azure_credential::{ClientSecretCredentials, Credentials, SecretValue};
//!
//! let credentials = Credentials::ClientSecret(ClientSecretCredentials {
//!     azure_cloud: Some("AzureCloud".into()),
//!     tenant_id: Some("t1".into()),
//!     client_id: Some("c1".into()),
//!     client_secret: None,
//! });
//!
//! assert!(!credentials.is_complete(false));
//! assert!(credentials.is_complete(true));
//!
//! let with_secret = Credentials::ClientSecret(ClientSecretCredentials {
//!     client_secret: Some(SecretValue::concealed()),
//!     ..ClientSecretCredentials::default()
//! });
//! assert_eq!(with_secret.auth_type().as_str(), "clientsecret");
//! ```

mod secret;

pub use secret::{ConcealedSecret, SecretValue};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::CredentialError;

/// Authentication scheme tag, as stored in `azureCredentials.authType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthType {
    /// Delegated: the server acts as the dashboard viewer
    #[serde(rename = "currentuser")]
    CurrentUser,
    /// Managed identity of the host
    #[serde(rename = "msi")]
    Msi,
    /// Workload identity federation
    #[serde(rename = "workloadidentity")]
    WorkloadIdentity,
    /// App registration with a client secret
    #[serde(rename = "clientsecret")]
    ClientSecret,
    /// Client secret exchanged on behalf of the caller
    #[serde(rename = "clientsecret-obo")]
    ClientSecretObo,
    /// Username and password
    #[serde(rename = "ad-password")]
    AdPassword,
    /// App registration with a client certificate
    #[serde(rename = "clientcertificate")]
    ClientCertificate,
}

impl AuthType {
    /// All known tags
    pub const ALL: [Self; 7] = [
        Self::CurrentUser,
        Self::Msi,
        Self::WorkloadIdentity,
        Self::ClientSecret,
        Self::ClientSecretObo,
        Self::AdPassword,
        Self::ClientCertificate,
    ];

    /// Storage tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentUser => "currentuser",
            Self::Msi => "msi",
            Self::WorkloadIdentity => "workloadidentity",
            Self::ClientSecret => "clientsecret",
            Self::ClientSecretObo => "clientsecret-obo",
            Self::AdPassword => "ad-password",
            Self::ClientCertificate => "clientcertificate",
        }
    }

    /// Human-readable scheme name used in error messages
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CurrentUser => "User Identity",
            Self::Msi => "Managed Identity",
            Self::WorkloadIdentity => "Workload Identity",
            Self::ClientSecret => "Client Secret",
            Self::ClientSecretObo => "Client Secret OBO",
            Self::AdPassword => "AD Password",
            Self::ClientCertificate => "Client Certificate",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|auth_type| auth_type.as_str() == s)
            .ok_or_else(|| CredentialError::unsupported(s))
    }
}

/// Client certificate encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateFormat {
    /// PEM certificate with a separate private key
    Pem,
    /// PKCS#12 bundle protected by a password
    Pfx,
}

impl CertificateFormat {
    /// Storage value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pem => "pem",
            Self::Pfx => "pfx",
        }
    }

    /// Parses a stored value, `None` when unrecognised
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pem" => Some(Self::Pem),
            "pfx" => Some(Self::Pfx),
            _ => None,
        }
    }
}

/// Credentials of one authentication scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `currentuser`
    CurrentUser(CurrentUserCredentials),
    /// `msi`
    Msi,
    /// `workloadidentity`
    WorkloadIdentity,
    /// `clientsecret`
    ClientSecret(ClientSecretCredentials),
    /// `clientsecret-obo`
    ClientSecretObo(ClientSecretCredentials),
    /// `ad-password`
    AdPassword(AdPasswordCredentials),
    /// `clientcertificate`
    ClientCertificate(ClientCertificateCredentials),
}

/// Delegated credentials with an optional fallback service identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUserCredentials {
    /// Identity used when no user is present (alerting, background queries)
    pub service_credentials: Option<Box<Credentials>>,
    pub service_credentials_enabled: Option<bool>,
}

/// Client-secret credentials, shared by `clientsecret` and `clientsecret-obo`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSecretCredentials {
    pub azure_cloud: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdPasswordCredentials {
    pub user_id: Option<String>,
    pub client_id: Option<String>,
    pub password: Option<SecretValue>,
}

/// Client-certificate credentials
///
/// `pem` needs the certificate and private key; `pfx` needs the
/// certificate and the key password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCertificateCredentials {
    pub azure_cloud: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub certificate_format: Option<CertificateFormat>,
    pub client_certificate: Option<SecretValue>,
    pub private_key: Option<SecretValue>,
    pub private_key_password: Option<SecretValue>,
}

impl Credentials {
    /// Tag of the active scheme
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::CurrentUser(_) => AuthType::CurrentUser,
            Self::Msi => AuthType::Msi,
            Self::WorkloadIdentity => AuthType::WorkloadIdentity,
            Self::ClientSecret(_) => AuthType::ClientSecret,
            Self::ClientSecretObo(_) => AuthType::ClientSecretObo,
            Self::AdPassword(_) => AuthType::AdPassword,
            Self::ClientCertificate(_) => AuthType::ClientCertificate,
        }
    }

    /// Whether the credentials carry everything their scheme needs
    ///
    /// With `ignore_secret`, client-secret credentials are complete without
    /// a secret; editors use this to validate the non-secret part of a form.
    pub fn is_complete(&self, ignore_secret: bool) -> bool {
        match self {
            Self::Msi | Self::WorkloadIdentity | Self::CurrentUser(_) => true,
            Self::ClientSecret(c) | Self::ClientSecretObo(c) => {
                is_set(&c.azure_cloud)
                    && is_set(&c.tenant_id)
                    && is_set(&c.client_id)
                    && (ignore_secret || secret_is_set(&c.client_secret))
            }
            Self::AdPassword(c) => {
                is_set(&c.client_id) && is_set(&c.user_id) && secret_is_set(&c.password)
            }
            Self::ClientCertificate(c) => {
                let common = is_set(&c.azure_cloud)
                    && is_set(&c.tenant_id)
                    && is_set(&c.client_id)
                    && secret_is_set(&c.client_certificate);
                match c.certificate_format {
                    Some(CertificateFormat::Pem) => common && secret_is_set(&c.private_key),
                    Some(CertificateFormat::Pfx) => {
                        common && secret_is_set(&c.private_key_password)
                    }
                    None => false,
                }
            }
        }
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn secret_is_set(value: &Option<SecretValue>) -> bool {
    value.as_ref().is_some_and(SecretValue::is_set)
}
