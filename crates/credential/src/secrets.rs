//! Field-level secret access
//!
//! Every secret-bearing credential field maps to one key in
//! `secureJsonData` / `secureJsonFields`. Reading a field follows a strict
//! priority: a concealment flag always beats plaintext, so a stale echoed
//! value can never shadow what the server holds.
//!
//! | Field                  | Key                  | Legacy                     |
//! |------------------------|----------------------|----------------------------|
//! | client secret          | `azureClientSecret`  | stored under `clientSecret`|
//! | AD password            | `password`           | legacy marker = concealed  |
//! | client certificate     | `clientCertificate`  | none                       |
//! | private key            | `privateKey`         | none                       |
//! | private key password   | `privateKeyPassword` | none                       |

use crate::core::SecretString;
use crate::credentials::{ConcealedSecret, SecretValue};
use crate::settings::{DataSourceSettings, SecureJsonFields};

/// How a field treats the legacy concealment marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKey {
    /// The field was once stored under this deprecated key
    Key(&'static str),
    /// No legacy key; on write the legacy marker still counts as concealed
    Alias,
    /// No legacy key; the legacy marker is not recognised
    None,
}

/// Storage description of one secret field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretField {
    pub key: &'static str,
    pub legacy: LegacyKey,
}

pub const CLIENT_SECRET: SecretField = SecretField {
    key: "azureClientSecret",
    legacy: LegacyKey::Key("clientSecret"),
};

pub const PASSWORD: SecretField = SecretField {
    key: "password",
    legacy: LegacyKey::Alias,
};

pub const CLIENT_CERTIFICATE: SecretField = SecretField {
    key: "clientCertificate",
    legacy: LegacyKey::None,
};

pub const PRIVATE_KEY: SecretField = SecretField {
    key: "privateKey",
    legacy: LegacyKey::None,
};

pub const PRIVATE_KEY_PASSWORD: SecretField = SecretField {
    key: "privateKeyPassword",
    legacy: LegacyKey::None,
};

/// Resolves a secret field of `settings`
///
/// Returns the current-concealed marker if the current flag is set, else
/// the legacy marker if the field has a legacy key whose flag is set, else
/// non-empty plaintext from `secureJsonData`, else `None`. Settings without
/// `secureJsonFields` yield `None`.
pub fn resolve_secret(settings: &DataSourceSettings, field: SecretField) -> Option<SecretValue> {
    let fields = settings.secure_json_fields.as_ref()?;

    if fields.is_set(field.key) {
        return Some(SecretValue::Concealed(ConcealedSecret::Current));
    }
    if let LegacyKey::Key(legacy_key) = field.legacy
        && fields.is_set(legacy_key)
    {
        return Some(SecretValue::Concealed(ConcealedSecret::Legacy));
    }

    settings
        .secure_json_data
        .get(field.key)
        .filter(|secret| !secret.is_empty())
        .cloned()
        .map(SecretValue::Plain)
}

/// Writes a secret field into `settings`
///
/// Non-empty plaintext goes to `secureJsonData`; anything else removes a
/// pending value, leaving the server-side secret as it is. Flags are
/// rewritten from `value`, so fresh plaintext clears both the current and
/// the legacy flag.
pub fn store_secret(settings: &mut DataSourceSettings, field: SecretField, value: Option<&SecretValue>) {
    match value.and_then(SecretValue::as_plain) {
        Some(plain) => settings.secure_json_data.insert(field.key, plain.clone()),
        None => {
            settings.secure_json_data.remove(field.key);
        }
    }

    let marker = value.and_then(SecretValue::as_concealed);
    let fields = settings
        .secure_json_fields
        .get_or_insert_with(SecureJsonFields::new);

    match field.legacy {
        LegacyKey::Key(legacy_key) => {
            fields.set(field.key, marker == Some(ConcealedSecret::Current));
            fields.set(legacy_key, marker == Some(ConcealedSecret::Legacy));
        }
        LegacyKey::Alias => fields.set(field.key, marker.is_some()),
        LegacyKey::None => fields.set(field.key, marker == Some(ConcealedSecret::Current)),
    }
}

/// Pending plaintext for `field`, if any
pub fn pending_secret(settings: &DataSourceSettings, field: SecretField) -> Option<&SecretString> {
    settings.secure_json_data.get(field.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SecureJsonData;
    use rstest::rstest;

    fn settings(fields: &[(&str, bool)], data: &[(&str, &str)]) -> DataSourceSettings {
        DataSourceSettings {
            secure_json_fields: Some(fields.iter().copied().collect()),
            secure_json_data: data.iter().copied().collect::<SecureJsonData>(),
            ..DataSourceSettings::default()
        }
    }

    #[test]
    fn test_current_flag_wins_over_plaintext() {
        let s = settings(&[("azureClientSecret", true)], &[("azureClientSecret", "stale")]);
        assert_eq!(resolve_secret(&s, CLIENT_SECRET), Some(SecretValue::concealed()));
    }

    #[test]
    fn test_current_flag_wins_over_legacy_flag() {
        let s = settings(&[("azureClientSecret", true), ("clientSecret", true)], &[]);
        assert_eq!(resolve_secret(&s, CLIENT_SECRET), Some(SecretValue::concealed()));
    }

    #[test]
    fn test_legacy_flag() {
        let s = settings(&[("clientSecret", true)], &[("azureClientSecret", "stale")]);
        assert_eq!(
            resolve_secret(&s, CLIENT_SECRET),
            Some(SecretValue::concealed_legacy())
        );
    }

    #[test]
    fn test_legacy_flag_ignored_for_fields_without_legacy_key() {
        let s = settings(&[("clientSecret", true)], &[]);
        assert_eq!(resolve_secret(&s, PASSWORD), None);
        assert_eq!(resolve_secret(&s, PRIVATE_KEY), None);
    }

    #[rstest]
    #[case(CLIENT_SECRET)]
    #[case(PASSWORD)]
    #[case(CLIENT_CERTIFICATE)]
    #[case(PRIVATE_KEY)]
    #[case(PRIVATE_KEY_PASSWORD)]
    fn test_plaintext_returned_verbatim(#[case] field: SecretField) {
        let s = settings(&[(field.key, false)], &[(field.key, "value")]);
        assert_eq!(resolve_secret(&s, field), Some(SecretValue::plain("value")));
    }

    #[rstest]
    #[case(CLIENT_SECRET)]
    #[case(PRIVATE_KEY_PASSWORD)]
    fn test_empty_plaintext_is_absent(#[case] field: SecretField) {
        let s = settings(&[], &[(field.key, "")]);
        assert_eq!(resolve_secret(&s, field), None);
    }

    #[test]
    fn test_without_secure_fields_everything_is_absent() {
        let s = DataSourceSettings {
            secure_json_data: [("azureClientSecret", "plain")].into_iter().collect(),
            ..DataSourceSettings::default()
        };
        assert_eq!(resolve_secret(&s, CLIENT_SECRET), None);
    }

    #[test]
    fn test_store_plaintext_clears_both_flags() {
        let mut s = settings(&[("azureClientSecret", true), ("clientSecret", true)], &[]);
        store_secret(&mut s, CLIENT_SECRET, Some(&SecretValue::plain("fresh")));

        let fields = s.secure_json_fields.as_ref().unwrap();
        assert_eq!(fields.get("azureClientSecret"), Some(false));
        assert_eq!(fields.get("clientSecret"), Some(false));
        assert_eq!(
            pending_secret(&s, CLIENT_SECRET),
            Some(&SecretString::new("fresh"))
        );
    }

    #[test]
    fn test_store_marker_drops_pending_plaintext() {
        let mut s = settings(&[], &[("azureClientSecret", "pending")]);
        store_secret(&mut s, CLIENT_SECRET, Some(&SecretValue::concealed_legacy()));

        let fields = s.secure_json_fields.as_ref().unwrap();
        assert_eq!(fields.get("azureClientSecret"), Some(false));
        assert_eq!(fields.get("clientSecret"), Some(true));
        assert!(pending_secret(&s, CLIENT_SECRET).is_none());
    }

    #[test]
    fn test_store_password_accepts_any_marker() {
        let mut s = DataSourceSettings::default();
        store_secret(&mut s, PASSWORD, Some(&SecretValue::concealed_legacy()));
        assert!(s.secure_json_fields.as_ref().unwrap().is_set("password"));
    }

    #[test]
    fn test_store_certificate_field_ignores_legacy_marker() {
        let mut s = DataSourceSettings::default();
        store_secret(&mut s, PRIVATE_KEY, Some(&SecretValue::concealed_legacy()));
        assert_eq!(s.secure_json_fields.as_ref().unwrap().get("privateKey"), Some(false));
        assert!(pending_secret(&s, PRIVATE_KEY).is_none());
    }

    #[test]
    fn test_store_empty_plaintext_writes_nothing() {
        let mut s = DataSourceSettings::default();
        store_secret(&mut s, CLIENT_CERTIFICATE, Some(&SecretValue::plain("")));
        assert!(s.secure_json_data.is_empty());
        assert_eq!(
            s.secure_json_fields.as_ref().unwrap().get("clientCertificate"),
            Some(false)
        );
    }
}
