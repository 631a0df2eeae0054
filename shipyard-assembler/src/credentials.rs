//! Per-environment deploy credentials
//!
//! Every environment gets two string parameters holding the access key id and
//! secret used by its build project. With admin permissions the parameters
//! point at a freshly declared deploy user's access key; otherwise they hold
//! placeholders that the operator replaces out of band. Builds only ever see
//! the parameter names.

use shipyard_core::domain::template::{AccessKey, Parameter, Resource, Token, User};

use crate::error::Result;
use crate::naming::{logical_id, parameter_name};
use crate::template::TemplateBuilder;

const ADMIN_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AdministratorAccess";
const ACCESS_KEY_ID_PLACEHOLDER: &str = "ACCESS_KEY_ID";
const SECRET_ACCESS_KEY_PLACEHOLDER: &str = "SECRET_ACCESS_KEY";

/// Names of the parameters holding an environment's credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSlots {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl CredentialSlots {
    pub fn for_environment(environment: &str) -> Self {
        Self {
            access_key_id: parameter_name(environment, "access_key_id"),
            secret_access_key: parameter_name(environment, "secret_access_key"),
        }
    }

    pub fn parameter_names(&self) -> Vec<String> {
        vec![self.access_key_id.clone(), self.secret_access_key.clone()]
    }
}

/// Declares the credential parameters (and deploy user when `admin_permissions`) for an environment
pub fn provision_credentials(
    template: &mut TemplateBuilder,
    environment: &str,
    admin_permissions: bool,
) -> Result<CredentialSlots> {
    let slots = CredentialSlots::for_environment(environment);

    let (access_key_id, secret_access_key) = if admin_permissions {
        let user = template.add(
            logical_id(&[environment, "DeployUser"]),
            Resource::User(User {
                managed_policy_arns: vec![ADMIN_POLICY_ARN.to_string()],
            }),
        )?;

        let key_id = logical_id(&[environment, "DeployCredentials"]);
        template.add(
            key_id.clone(),
            Resource::AccessKey(AccessKey { user_name: user }),
        )?;

        tracing::info!("Minted deploy credentials for environment {}", environment);
        (
            Token::reference(key_id.clone()),
            Token::attribute(key_id, "SecretAccessKey"),
        )
    } else {
        (
            Token::literal(ACCESS_KEY_ID_PLACEHOLDER),
            Token::literal(SECRET_ACCESS_KEY_PLACEHOLDER),
        )
    };

    template.add(
        logical_id(&[environment, "DeployAccessKeyId"]),
        Resource::Parameter(Parameter {
            name: slots.access_key_id.clone(),
            value: access_key_id,
            description: Some(format!("Deploy access key id for {environment}")),
        }),
    )?;
    template.add(
        logical_id(&[environment, "DeploySecretAccessKey"]),
        Resource::Parameter(Parameter {
            name: slots.secret_access_key.clone(),
            value: secret_access_key,
            description: Some(format!("Deploy secret access key for {environment}")),
        }),
    )?;

    Ok(slots)
}
