//! Capability settings and the context passed to the reader and writer
//!
//! The host decides which authentication schemes are allowed. Those flags
//! are read once into [`AzureAuthSettings`] and handed to every call through
//! [`AuthContext`]; nothing here reads process-wide state on its own.
//!
//! ```
//! use azure_credential::{AuthContext, AzureAuthSettings, FixedCloud};
//!
//! let settings = AzureAuthSettings::from_toml_str(
//!     "managed_identity_enabled = true\nuser_identity_enabled = true",
//! )
//! .unwrap();
//! assert!(!settings.workload_identity_enabled);
//!
//! let ctx = AuthContext::new(settings)
//!     .with_obo(true)
//!     .with_cloud_resolver(FixedCloud::new("AzureUSGovernment"));
//! assert_eq!(ctx.default_cloud(), "AzureUSGovernment");
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clouds::{CloudResolver, PredefinedClouds};
use crate::core::Result;

/// Environment variable enabling managed identity
pub const MANAGED_IDENTITY_ENV: &str = "GF_AZURE_MANAGED_IDENTITY_ENABLED";
/// Environment variable enabling workload identity
pub const WORKLOAD_IDENTITY_ENV: &str = "GF_AZURE_WORKLOAD_IDENTITY_ENABLED";
/// Environment variable enabling delegated user identity
pub const USER_IDENTITY_ENV: &str = "GF_AZURE_USER_IDENTITY_ENABLED";

/// Host-wide capability flags
///
/// Everything is disabled unless turned on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureAuthSettings {
    pub managed_identity_enabled: bool,
    pub workload_identity_enabled: bool,
    pub user_identity_enabled: bool,
}

impl AzureAuthSettings {
    /// Parses flags from a TOML document; missing keys stay disabled
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads flags from the `GF_AZURE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads flags through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).as_deref().is_some_and(parse_flag);
        Self {
            managed_identity_enabled: flag(MANAGED_IDENTITY_ENV),
            workload_identity_enabled: flag(WORKLOAD_IDENTITY_ENV),
            user_identity_enabled: flag(USER_IDENTITY_ENV),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Inputs shared by [`resolve`](crate::resolve) and [`apply`](crate::apply)
///
/// `obo_enabled` is per plugin instance, unlike the host-wide flags.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub settings: AzureAuthSettings,
    pub obo_enabled: bool,
    clouds: Arc<dyn CloudResolver>,
}

impl AuthContext {
    /// Context with on-behalf-of disabled and the predefined clouds
    pub fn new(settings: AzureAuthSettings) -> Self {
        Self {
            settings,
            obo_enabled: false,
            clouds: Arc::new(PredefinedClouds),
        }
    }

    /// Set the on-behalf-of capability (builder pattern)
    pub fn with_obo(mut self, enabled: bool) -> Self {
        self.obo_enabled = enabled;
        self
    }

    /// Set the default-cloud lookup (builder pattern)
    pub fn with_cloud_resolver(mut self, resolver: impl CloudResolver + 'static) -> Self {
        self.clouds = Arc::new(resolver);
        self
    }

    pub fn default_cloud(&self) -> &str {
        self.clouds.default_cloud()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new(AzureAuthSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_disabled() {
        let ctx = AuthContext::default();
        assert_eq!(ctx.settings, AzureAuthSettings::default());
        assert!(!ctx.obo_enabled);
        assert_eq!(ctx.default_cloud(), "AzureCloud");
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = AzureAuthSettings::from_toml_str("workload_identity_enabled = true").unwrap();
        assert!(settings.workload_identity_enabled);
        assert!(!settings.managed_identity_enabled);
        assert!(!settings.user_identity_enabled);
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        let err = AzureAuthSettings::from_toml_str("managed_identity_enabled = \"maybe\"").unwrap_err();
        assert!(err.to_string().contains("Invalid Azure auth configuration"));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (MANAGED_IDENTITY_ENV, "True"),
            (WORKLOAD_IDENTITY_ENV, "0"),
            (USER_IDENTITY_ENV, " on "),
        ]);
        let settings = AzureAuthSettings::from_lookup(|key| env.get(key).map(|v| (*v).to_owned()));
        assert!(settings.managed_identity_enabled);
        assert!(!settings.workload_identity_enabled);
        assert!(settings.user_identity_enabled);
    }

    #[test]
    fn test_from_lookup_missing_vars() {
        let settings = AzureAuthSettings::from_lookup(|_| None);
        assert_eq!(settings, AzureAuthSettings::default());
    }
}
