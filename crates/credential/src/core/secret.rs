//! Plaintext secret holder

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

const REDACTED: &str = "[REDACTED]";

/// A client secret, password, certificate or private key in plaintext
///
/// The buffer is wiped on drop. Formatting and serde serialization print
/// `[REDACTED]`; the plaintext is only reachable through [`expose_secret`].
///
/// [`expose_secret`]: SecretString::expose_secret
///
/// ```
/// use azure_credential::SecretString;
///
/// let secret = SecretString::new("p@ss");
/// assert!(secret.expose_secret(|plain| plain.starts_with('p')));
/// assert_eq!(format!("{secret:?}"), "[REDACTED]");
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    plain: String,
}

impl SecretString {
    pub fn new(plain: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
        }
    }

    /// Runs `f` against the plaintext
    pub fn expose_secret<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.plain)
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }
}

impl From<&str> for SecretString {
    fn from(plain: &str) -> Self {
        Self::new(plain)
    }
}

impl From<String> for SecretString {
    fn from(plain: String) -> Self {
        Self::new(plain)
    }
}

// Constant time: an echoed secret compared against a pending one must not
// leak the length of the common prefix.
impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.plain.as_bytes().ct_eq(other.plain.as_bytes()).into()
    }
}

impl Eq for SecretString {}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
