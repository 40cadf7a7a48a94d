//! Azure clouds and the default-cloud lookup

use std::fmt;

/// Cloud id used when none is configured
pub const DEFAULT_AZURE_CLOUD: &str = "AzureCloud";

/// A selectable Azure cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AzureCloudInfo {
    /// Identifier stored in `azureCloud`
    pub name: &'static str,
    pub display_name: &'static str,
}

const PREDEFINED_CLOUDS: &[AzureCloudInfo] = &[
    AzureCloudInfo {
        name: "AzureCloud",
        display_name: "Azure",
    },
    AzureCloudInfo {
        name: "AzureChinaCloud",
        display_name: "Azure China",
    },
    AzureCloudInfo {
        name: "AzureUSGovernment",
        display_name: "Azure US Government",
    },
];

/// Clouds offered by the settings editor
pub fn azure_clouds() -> &'static [AzureCloudInfo] {
    PREDEFINED_CLOUDS
}

/// Supplies the cloud id used when credentials leave `azureCloud` unset
///
/// Implementations must return a non-empty id.
pub trait CloudResolver: Send + Sync + fmt::Debug {
    fn default_cloud(&self) -> &str;
}

/// Resolves to the public Azure cloud
#[derive(Debug, Clone, Copy, Default)]
pub struct PredefinedClouds;

impl CloudResolver for PredefinedClouds {
    fn default_cloud(&self) -> &str {
        DEFAULT_AZURE_CLOUD
    }
}

/// Resolves to a host-chosen cloud, e.g. a sovereign-cloud deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCloud(String);

impl FixedCloud {
    /// Falls back to [`DEFAULT_AZURE_CLOUD`] when `cloud` is empty
    pub fn new(cloud: impl Into<String>) -> Self {
        let cloud = cloud.into();
        if cloud.is_empty() {
            Self(DEFAULT_AZURE_CLOUD.to_owned())
        } else {
            Self(cloud)
        }
    }
}

impl CloudResolver for FixedCloud {
    fn default_cloud(&self) -> &str {
        &self.0
    }
}
