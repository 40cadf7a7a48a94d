//! Secret-bearing field values
//!
//! A secret field in the live model is either plaintext the user just typed,
//! or a marker saying the value already lives on the server. The two markers
//! are distinguished by identity: [`ConcealedSecret::Current`] for a value
//! stored under its current key, [`ConcealedSecret::Legacy`] for one stored
//! under a deprecated key.

use crate::core::SecretString;

/// Marker for a secret that is stored server-side and never sent back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcealedSecret {
    /// Stored under the current field name
    Current,
    /// Stored under the deprecated field name
    Legacy,
}

/// Value of a secret-bearing credential field
///
/// Fields holding one of these are typed `Option<SecretValue>`; `None`
/// means the secret is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// Plaintext supplied by the user, not yet stored
    Plain(SecretString),
    /// Already stored on the server
    Concealed(ConcealedSecret),
}

impl SecretValue {
    /// Plaintext secret
    pub fn plain(value: impl Into<SecretString>) -> Self {
        Self::Plain(value.into())
    }

    /// Marker for a secret stored under its current key
    pub const fn concealed() -> Self {
        Self::Concealed(ConcealedSecret::Current)
    }

    /// Marker for a secret stored under a legacy key
    pub const fn concealed_legacy() -> Self {
        Self::Concealed(ConcealedSecret::Legacy)
    }

    /// Whether a usable secret is present
    ///
    /// Both markers count; empty plaintext does not.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Plain(secret) => !secret.is_empty(),
            Self::Concealed(_) => true,
        }
    }

    /// Non-empty plaintext, if this is plaintext
    pub fn as_plain(&self) -> Option<&SecretString> {
        match self {
            Self::Plain(secret) if !secret.is_empty() => Some(secret),
            _ => None,
        }
    }

    /// Concealment marker, if this is one
    pub fn as_concealed(&self) -> Option<ConcealedSecret> {
        match self {
            Self::Concealed(marker) => Some(*marker),
            Self::Plain(_) => None,
        }
    }
}

impl From<ConcealedSecret> for SecretValue {
    fn from(marker: ConcealedSecret) -> Self {
        Self::Concealed(marker)
    }
}
