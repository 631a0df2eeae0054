//! Build spec and build variable preparation

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use shipyard_core::domain::pipeline::BuildVariable;

use crate::credentials::CredentialSlots;
use crate::error::{AssemblyError, Result};

pub const ACCESS_KEY_ID_VARIABLE: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VARIABLE: &str = "AWS_SECRET_ACCESS_KEY";

/// Returns a copy of `build_spec` whose `env.parameter-store` maps the
/// credential variables to their parameter names
///
/// User defined `env` entries are kept; the credential entries win on conflict.
pub fn inject_credentials(
    environment: &str,
    build_spec: &Value,
    slots: &CredentialSlots,
) -> Result<Value> {
    let Value::Object(spec) = build_spec else {
        return Err(AssemblyError::InvalidBuildSpec(environment.to_string()));
    };
    let mut spec = spec.clone();

    let env = spec
        .entry("env")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(env) = env else {
        return Err(AssemblyError::InvalidBuildSpec(environment.to_string()));
    };

    let store = env
        .entry("parameter-store")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(store) = store else {
        return Err(AssemblyError::InvalidBuildSpec(environment.to_string()));
    };
    store.insert(
        ACCESS_KEY_ID_VARIABLE.to_string(),
        Value::String(slots.access_key_id.clone()),
    );
    store.insert(
        SECRET_ACCESS_KEY_VARIABLE.to_string(),
        Value::String(slots.secret_access_key.clone()),
    );

    Ok(Value::Object(spec))
}

/// Plaintext runtime variables merged with the two credential parameter references
pub fn build_variables(
    runtime_variables: &BTreeMap<String, String>,
    slots: &CredentialSlots,
) -> BTreeMap<String, BuildVariable> {
    let mut variables: BTreeMap<_, _> = runtime_variables
        .iter()
        .map(|(k, v)| (k.clone(), BuildVariable::plaintext(v)))
        .collect();

    variables.insert(
        ACCESS_KEY_ID_VARIABLE.to_string(),
        BuildVariable::parameter(&slots.access_key_id),
    );
    variables.insert(
        SECRET_ACCESS_KEY_VARIABLE.to_string(),
        BuildVariable::parameter(&slots.secret_access_key),
    );

    variables
}
