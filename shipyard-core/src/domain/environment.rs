//! Environment domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A backend deployment target (e.g. "dev", "prod")
///
/// Each environment becomes one pipeline stage running a build project with
/// its own credential scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendEnvironment {
    pub name: String,
    #[serde(default)]
    pub approval_required: bool,
    /// Mint a deploy user with administrator access for this environment.
    /// Without it the operator fills the credential parameters by hand.
    #[serde(default)]
    pub admin_permissions: bool,
    /// Run the build container in privileged mode (needed for docker builds)
    #[serde(default)]
    pub privileged_mode: bool,
    #[serde(default)]
    pub runtime_variables: BTreeMap<String, String>,
    /// Build instructions, must be a JSON object
    pub build_spec: serde_json::Value,
}

impl BackendEnvironment {
    /// Creates an environment with an empty build spec and default flags
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            approval_required: false,
            admin_permissions: false,
            privileged_mode: false,
            runtime_variables: BTreeMap::new(),
            build_spec: serde_json::json!({}),
        }
    }

    pub fn with_approval(mut self) -> Self {
        self.approval_required = true;
        self
    }

    pub fn with_admin_permissions(mut self) -> Self {
        self.admin_permissions = true;
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.runtime_variables.insert(key.into(), value.into());
        self
    }

    pub fn with_build_spec(mut self, build_spec: serde_json::Value) -> Self {
        self.build_spec = build_spec;
        self
    }
}

/// A frontend deployment target served from a CDN distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendEnvironment {
    pub name: String,
    #[serde(default)]
    pub approval_required: bool,
    /// Alternate domain names for the distribution (e.g. `app.example.com`)
    pub aliases: Vec<String>,
    #[serde(default)]
    pub price_class: PriceClass,
    pub default_root_object: Option<String>,
    pub error_root_object: Option<String>,
    pub domain_name_registrar: Option<DomainNameRegistrar>,
    /// Aliases for a separate static assets distribution, none when empty
    #[serde(default)]
    pub assets_aliases: Vec<String>,
}

impl FrontendEnvironment {
    pub fn new(name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            name: name.into(),
            approval_required: false,
            aliases,
            price_class: PriceClass::default(),
            default_root_object: None,
            error_root_object: None,
            domain_name_registrar: None,
            assets_aliases: Vec::new(),
        }
    }
}

/// Common view over backend and frontend environments
pub trait Environment {
    fn name(&self) -> &str;
    fn approval_required(&self) -> bool;
}

impl Environment for BackendEnvironment {
    fn name(&self) -> &str {
        &self.name
    }

    fn approval_required(&self) -> bool {
        self.approval_required
    }
}

impl Environment for FrontendEnvironment {
    fn name(&self) -> &str {
        &self.name
    }

    fn approval_required(&self) -> bool {
        self.approval_required
    }
}

/// CDN pricing plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceClass {
    #[default]
    #[serde(rename = "PriceClass_100")]
    PriceClass100,
    #[serde(rename = "PriceClass_200")]
    PriceClass200,
    #[serde(rename = "PriceClass_All")]
    PriceClassAll,
}

/// Registrar managing the environment's domain names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainNameRegistrar {
    /// Records are registered in the hosted zone
    Aws,
}
