//! Credential writer: live credentials to persisted settings
//!
//! Writing is strict: a scheme whose capability is off is an error, never a
//! silently saved configuration that cannot be used. Every write also
//! retires the legacy top-level auth fields of `jsonData`.

use tracing::{debug, warn};

use crate::config::AuthContext;
use crate::core::{CredentialError, Result};
use crate::credentials::{AuthType, ClientCertificateCredentials, Credentials};
use crate::reader::cloud_or_default;
use crate::secrets::{
    CLIENT_CERTIFICATE, CLIENT_SECRET, PASSWORD, PRIVATE_KEY, PRIVATE_KEY_PASSWORD, store_secret,
};
use crate::settings::{CredentialsRecord, DataSourceSettings};

/// Produces updated settings holding `credentials`
///
/// `settings` is left untouched; the result is a modified copy. Plaintext
/// secrets land in `secureJsonData` only, concealment markers become
/// `secureJsonFields` flags, and `jsonData.azureCredentials` never holds a
/// secret.
///
/// # Errors
///
/// - [`CredentialError::CapabilityDisabled`] for `msi`, `workloadidentity`,
///   `currentuser` or `clientsecret-obo` when the matching capability is off
/// - [`CredentialError::UnsupportedAuthType`] when delegated credentials nest
///   another delegated identity
///
/// # Examples
///
/// ```
/// use azure_credential::{
///     AuthContext, ClientSecretCredentials, Credentials, DataSourceSettings, SecretValue, apply,
/// };
///
/// let before = DataSourceSettings::default();
/// let credentials = Credentials::ClientSecret(ClientSecretCredentials {
///     tenant_id: Some("t1".into()),
///     client_id: Some("c1".into()),
///     client_secret: Some(SecretValue::plain("s3cret")),
///     ..ClientSecretCredentials::default()
/// });
///
/// let after = apply(&before, &credentials, &AuthContext::default()).unwrap();
/// let record = after.json_data.azure_credentials.as_ref().unwrap();
/// assert_eq!(record.azure_cloud.as_deref(), Some("AzureCloud"));
/// assert!(after.secure_json_data.contains_key("azureClientSecret"));
/// assert!(before.json_data.azure_credentials.is_none());
/// ```
pub fn apply(
    settings: &DataSourceSettings,
    credentials: &Credentials,
    ctx: &AuthContext,
) -> Result<DataSourceSettings> {
    let auth_type = credentials.auth_type();
    debug!(auth_type = %auth_type, "updating datasource credentials");

    let mut updated = settings.clone();
    updated.json_data.clear_legacy_credentials();

    match credentials {
        Credentials::Msi => {
            ensure_enabled(ctx.settings.managed_identity_enabled, auth_type)?;
        }
        Credentials::WorkloadIdentity => {
            ensure_enabled(ctx.settings.workload_identity_enabled, auth_type)?;
        }
        Credentials::ClientSecret(c) => {
            store_secret(&mut updated, CLIENT_SECRET, c.client_secret.as_ref());
        }
        Credentials::ClientSecretObo(c) => {
            ensure_enabled(ctx.obo_enabled, auth_type)?;
            store_secret(&mut updated, CLIENT_SECRET, c.client_secret.as_ref());
            updated.json_data.oauth_pass_thru = Some(true);
        }
        Credentials::AdPassword(c) => {
            store_secret(&mut updated, PASSWORD, c.password.as_ref());
        }
        Credentials::ClientCertificate(c) => {
            store_certificate_secrets(&mut updated, c);
        }
        Credentials::CurrentUser(c) => {
            ensure_enabled(ctx.settings.user_identity_enabled, auth_type)?;

            // The client-secret slot is always rewritten so switching the
            // service identity away from a client secret retires it.
            match c.service_credentials.as_deref() {
                Some(Credentials::ClientSecret(service)) => {
                    store_secret(&mut updated, CLIENT_SECRET, service.client_secret.as_ref());
                }
                Some(Credentials::ClientCertificate(service)) => {
                    store_secret(&mut updated, CLIENT_SECRET, None);
                    store_certificate_secrets(&mut updated, service);
                }
                _ => store_secret(&mut updated, CLIENT_SECRET, None),
            }

            // Identity varies per caller, so responses must not be cached.
            updated.json_data.oauth_pass_thru = Some(true);
            updated.json_data.disable_grafana_cache = Some(true);
        }
    }

    updated.json_data.azure_credentials = Some(to_record(credentials, Some(ctx.default_cloud()))?);
    Ok(updated)
}

fn ensure_enabled(capability: bool, auth_type: AuthType) -> Result<()> {
    if capability {
        Ok(())
    } else {
        warn!(auth_type = %auth_type, "refusing to save credentials for a disabled scheme");
        Err(CredentialError::CapabilityDisabled { auth_type })
    }
}

fn store_certificate_secrets(
    settings: &mut DataSourceSettings,
    credentials: &ClientCertificateCredentials,
) {
    store_secret(settings, CLIENT_CERTIFICATE, credentials.client_certificate.as_ref());
    store_secret(settings, PRIVATE_KEY, credentials.private_key.as_ref());
    store_secret(settings, PRIVATE_KEY_PASSWORD, credentials.private_key_password.as_ref());
}

// Builds the plaintext part of `credentials`. Secret fields have no place
// in `CredentialsRecord`, so they are dropped here by construction.
fn to_record(credentials: &Credentials, default_cloud: Option<&str>) -> Result<CredentialsRecord> {
    let mut record = CredentialsRecord::new(credentials.auth_type());
    match credentials {
        Credentials::Msi | Credentials::WorkloadIdentity => {}
        Credentials::ClientSecret(c) | Credentials::ClientSecretObo(c) => {
            record.azure_cloud = cloud_or_default(c.azure_cloud.as_deref(), default_cloud);
            record.tenant_id = c.tenant_id.clone();
            record.client_id = c.client_id.clone();
        }
        Credentials::AdPassword(c) => {
            record.user_id = c.user_id.clone();
            record.client_id = c.client_id.clone();
        }
        Credentials::ClientCertificate(c) => {
            record.azure_cloud = cloud_or_default(c.azure_cloud.as_deref(), default_cloud);
            record.tenant_id = c.tenant_id.clone();
            record.client_id = c.client_id.clone();
            record.certificate_format = c.certificate_format.map(|f| f.as_str().to_owned());
        }
        Credentials::CurrentUser(c) => {
            record.service_credentials_enabled = c.service_credentials_enabled;
            record.service_credentials = c
                .service_credentials
                .as_deref()
                .map(service_record)
                .transpose()?
                .map(Box::new);
        }
    }
    Ok(record)
}

// Service credentials are stored as given, without a cloud default.
fn service_record(credentials: &Credentials) -> Result<CredentialsRecord> {
    if let Credentials::CurrentUser(_) = credentials {
        return Err(CredentialError::unsupported(AuthType::CurrentUser.as_str()));
    }
    to_record(credentials, None)
}
