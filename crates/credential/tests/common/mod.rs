//! Shared settings fixtures for integration tests

#![allow(dead_code)]

use azure_credential::prelude::*;
use serde_json::json;

/// Routes crate logs to the test harness output; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn settings(value: serde_json::Value) -> DataSourceSettings {
    DataSourceSettings::from_value(value).expect("fixture settings decode")
}

pub fn with_msi_credentials() -> DataSourceSettings {
    settings(json!({ "jsonData": { "azureCredentials": { "authType": "msi" } } }))
}

pub fn with_client_secret_in_secure_data() -> DataSourceSettings {
    settings(json!({
        "jsonData": {
            "azureCredentials": { "authType": "clientsecret", "clientId": "testClientId", "tenantId": "testTenantId" }
        },
        "secureJsonFields": { "azureClientSecret": false },
        "secureJsonData": { "azureClientSecret": "testClientSecret" }
    }))
}

pub fn with_client_secret_on_server() -> DataSourceSettings {
    settings(json!({
        "jsonData": {
            "azureCredentials": { "authType": "clientsecret", "clientId": "testClientId", "tenantId": "testTenantId" }
        },
        "secureJsonFields": { "azureClientSecret": true }
    }))
}

pub fn with_legacy_client_secret_on_server() -> DataSourceSettings {
    settings(json!({
        "jsonData": {
            "azureCredentials": { "authType": "clientsecret", "clientId": "testClientId", "tenantId": "testTenantId" }
        },
        "secureJsonFields": { "clientSecret": true }
    }))
}

/// Client-secret credentials matching the fixtures above, secret left to the caller
pub fn client_secret(secret: Option<SecretValue>) -> ClientSecretCredentials {
    ClientSecretCredentials {
        azure_cloud: Some("AzureCloud".into()),
        tenant_id: Some("testTenantId".into()),
        client_id: Some("testClientId".into()),
        client_secret: secret,
    }
}

pub fn ctx(managed: bool, workload: bool, user: bool) -> AuthContext {
    AuthContext::new(AzureAuthSettings {
        managed_identity_enabled: managed,
        workload_identity_enabled: workload,
        user_identity_enabled: user,
    })
}

pub fn all_enabled() -> AuthContext {
    ctx(true, true, true).with_obo(true)
}

pub fn all_disabled() -> AuthContext {
    ctx(false, false, false)
}
