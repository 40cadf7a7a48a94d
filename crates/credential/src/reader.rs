//! Credential reader: persisted settings to live credentials
//!
//! Reading is tolerant. A scheme whose capability is switched off resolves
//! to `Ok(None)` instead of an error, so a dashboard keeps rendering with
//! the datasource's default credentials. Only an unknown `authType` fails.

use tracing::{debug, warn};

use crate::config::AuthContext;
use crate::core::{CredentialError, Result};
use crate::credentials::{
    AdPasswordCredentials, AuthType, CertificateFormat, ClientCertificateCredentials,
    ClientSecretCredentials, Credentials, CurrentUserCredentials,
};
use crate::secrets::{
    CLIENT_CERTIFICATE, CLIENT_SECRET, PASSWORD, PRIVATE_KEY, PRIVATE_KEY_PASSWORD,
    resolve_secret,
};
use crate::settings::{CredentialsRecord, DataSourceSettings};

/// Resolves the credentials a datasource should use
///
/// Returns `Ok(None)` when `jsonData.azureCredentials` is absent or names a
/// disabled scheme; the caller then substitutes its own default.
///
/// # Errors
///
/// [`CredentialError::UnsupportedAuthType`] if the stored tag, or the tag of
/// nested service credentials, is unknown.
///
/// # Examples
///
/// ```
/// use azure_credential::{
///     AuthContext, AzureAuthSettings, Credentials, DataSourceSettings, SecretValue, resolve,
/// };
///
/// let settings = DataSourceSettings::from_json(
///     r#"{
///         "jsonData": {"azureCredentials": {"authType": "clientsecret", "clientId": "c1", "tenantId": "t1"}},
///         "secureJsonFields": {"azureClientSecret": true}
///     }"#,
/// )
/// .unwrap();
///
/// let ctx = AuthContext::new(AzureAuthSettings::default());
/// let Some(Credentials::ClientSecret(credentials)) = resolve(&settings, &ctx).unwrap() else {
///     panic!("expected client secret credentials");
/// };
/// assert_eq!(credentials.azure_cloud.as_deref(), Some("AzureCloud"));
/// assert_eq!(credentials.client_secret, Some(SecretValue::concealed()));
/// ```
pub fn resolve(settings: &DataSourceSettings, ctx: &AuthContext) -> Result<Option<Credentials>> {
    let Some(record) = settings.json_data.azure_credentials.as_ref() else {
        debug!("no azureCredentials in settings, using datasource defaults");
        return Ok(None);
    };

    let auth_type: AuthType = record.auth_type.parse()?;
    debug!(auth_type = %auth_type, "resolving datasource credentials");

    let credentials = match auth_type {
        AuthType::Msi => {
            enabled(ctx.settings.managed_identity_enabled, auth_type).then_some(Credentials::Msi)
        }
        AuthType::WorkloadIdentity => enabled(ctx.settings.workload_identity_enabled, auth_type)
            .then_some(Credentials::WorkloadIdentity),
        AuthType::ClientSecret => Some(Credentials::ClientSecret(client_secret(
            record,
            settings,
            Some(ctx.default_cloud()),
        ))),
        AuthType::ClientSecretObo => enabled(ctx.obo_enabled, auth_type).then(|| {
            Credentials::ClientSecretObo(client_secret(
                record,
                settings,
                Some(ctx.default_cloud()),
            ))
        }),
        AuthType::AdPassword => Some(Credentials::AdPassword(ad_password(record, settings))),
        AuthType::ClientCertificate => Some(Credentials::ClientCertificate(client_certificate(
            record,
            settings,
            Some(ctx.default_cloud()),
        ))),
        AuthType::CurrentUser => {
            if enabled(ctx.settings.user_identity_enabled, auth_type) {
                Some(Credentials::CurrentUser(current_user(record, settings)?))
            } else {
                None
            }
        }
    };

    Ok(credentials)
}

fn enabled(capability: bool, auth_type: AuthType) -> bool {
    if !capability {
        warn!(
            auth_type = %auth_type,
            "{} authentication is disabled, falling back to default credentials",
            auth_type.display_name()
        );
    }
    capability
}

fn current_user(
    record: &CredentialsRecord,
    settings: &DataSourceSettings,
) -> Result<CurrentUserCredentials> {
    let service_credentials = record
        .service_credentials
        .as_deref()
        .map(|nested| service_credentials(nested, settings))
        .transpose()?
        .map(Box::new);

    Ok(CurrentUserCredentials {
        service_credentials,
        service_credentials_enabled: record.service_credentials_enabled,
    })
}

// Client-secret and certificate service identities get their secrets
// inlined; other schemes pass through as stored.
fn service_credentials(
    record: &CredentialsRecord,
    settings: &DataSourceSettings,
) -> Result<Credentials> {
    let auth_type: AuthType = record.auth_type.parse()?;
    let credentials = match auth_type {
        AuthType::CurrentUser => return Err(CredentialError::unsupported(auth_type.as_str())),
        AuthType::Msi => Credentials::Msi,
        AuthType::WorkloadIdentity => Credentials::WorkloadIdentity,
        AuthType::ClientSecret => {
            Credentials::ClientSecret(client_secret(record, settings, None))
        }
        AuthType::ClientSecretObo => Credentials::ClientSecretObo(ClientSecretCredentials {
            client_secret: None,
            ..client_secret(record, settings, None)
        }),
        AuthType::AdPassword => Credentials::AdPassword(AdPasswordCredentials {
            password: None,
            ..ad_password(record, settings)
        }),
        AuthType::ClientCertificate => {
            Credentials::ClientCertificate(client_certificate(record, settings, None))
        }
    };
    Ok(credentials)
}

fn client_secret(
    record: &CredentialsRecord,
    settings: &DataSourceSettings,
    default_cloud: Option<&str>,
) -> ClientSecretCredentials {
    ClientSecretCredentials {
        azure_cloud: cloud_or_default(record.azure_cloud.as_deref(), default_cloud),
        tenant_id: record.tenant_id.clone(),
        client_id: record.client_id.clone(),
        client_secret: resolve_secret(settings, CLIENT_SECRET),
    }
}

fn ad_password(record: &CredentialsRecord, settings: &DataSourceSettings) -> AdPasswordCredentials {
    AdPasswordCredentials {
        user_id: record.user_id.clone(),
        client_id: record.client_id.clone(),
        password: resolve_secret(settings, PASSWORD),
    }
}

fn client_certificate(
    record: &CredentialsRecord,
    settings: &DataSourceSettings,
    default_cloud: Option<&str>,
) -> ClientCertificateCredentials {
    ClientCertificateCredentials {
        azure_cloud: cloud_or_default(record.azure_cloud.as_deref(), default_cloud),
        tenant_id: record.tenant_id.clone(),
        client_id: record.client_id.clone(),
        certificate_format: record.certificate_format.as_deref().and_then(certificate_format),
        client_certificate: resolve_secret(settings, CLIENT_CERTIFICATE),
        private_key: resolve_secret(settings, PRIVATE_KEY),
        private_key_password: resolve_secret(settings, PRIVATE_KEY_PASSWORD),
    }
}

fn certificate_format(value: &str) -> Option<CertificateFormat> {
    let format = CertificateFormat::parse(value);
    if format.is_none() {
        warn!(format = value, "unrecognised certificate format");
    }
    format
}

pub(crate) fn cloud_or_default(cloud: Option<&str>, default_cloud: Option<&str>) -> Option<String> {
    cloud
        .filter(|cloud| !cloud.is_empty())
        .or(default_cloud)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AzureAuthSettings;
    use crate::settings::JsonData;
    use pretty_assertions::assert_eq;

    fn with_record(record: CredentialsRecord) -> DataSourceSettings {
        DataSourceSettings::with_json_data(JsonData {
            azure_credentials: Some(record),
            ..JsonData::default()
        })
    }

    #[test]
    fn test_cloud_or_default() {
        assert_eq!(
            cloud_or_default(Some("AzureChinaCloud"), Some("AzureCloud")).as_deref(),
            Some("AzureChinaCloud")
        );
        assert_eq!(
            cloud_or_default(Some(""), Some("AzureCloud")).as_deref(),
            Some("AzureCloud")
        );
        assert_eq!(cloud_or_default(None, None), None);
    }

    #[test]
    fn test_unknown_certificate_format_reads_as_none() {
        let settings = with_record(CredentialsRecord {
            certificate_format: Some("der".into()),
            ..CredentialsRecord::new(AuthType::ClientCertificate)
        });
        let resolved = resolve(&settings, &AuthContext::default()).unwrap();
        let Some(Credentials::ClientCertificate(credentials)) = resolved else {
            panic!("expected certificate credentials");
        };
        assert_eq!(credentials.certificate_format, None);
    }

    #[test]
    fn test_nested_current_user_is_rejected() {
        let settings = with_record(CredentialsRecord {
            service_credentials: Some(Box::new(CredentialsRecord::new(AuthType::CurrentUser))),
            ..CredentialsRecord::new(AuthType::CurrentUser)
        });
        let ctx = AuthContext::new(AzureAuthSettings {
            user_identity_enabled: true,
            ..AzureAuthSettings::default()
        });
        let err = resolve(&settings, &ctx).unwrap_err();
        assert!(matches!(err, CredentialError::UnsupportedAuthType { .. }));
    }

    #[test]
    fn test_nested_password_passes_through_without_secret() {
        let mut settings = with_record(CredentialsRecord {
            service_credentials: Some(Box::new(CredentialsRecord {
                user_id: Some("u1".into()),
                ..CredentialsRecord::new(AuthType::AdPassword)
            })),
            ..CredentialsRecord::new(AuthType::CurrentUser)
        });
        settings.secure_json_fields = Some([("password", true)].into_iter().collect());
        let ctx = AuthContext::new(AzureAuthSettings {
            user_identity_enabled: true,
            ..AzureAuthSettings::default()
        });

        let resolved = resolve(&settings, &ctx).unwrap();
        assert_eq!(
            resolved,
            Some(Credentials::CurrentUser(CurrentUserCredentials {
                service_credentials: Some(Box::new(Credentials::AdPassword(
                    AdPasswordCredentials {
                        user_id: Some("u1".into()),
                        client_id: None,
                        password: None,
                    }
                ))),
                service_credentials_enabled: None,
            }))
        );
    }
}
