//! Name derivation
//!
//! Stage names, logical ids and physical names are all derived from the
//! environment name so that re-running synthesis on the same definition
//! yields the same template.

use heck::{ToKebabCase, ToUpperCamelCase};

/// Root of every parameter name declared by Shipyard
pub const PARAMETER_PREFIX: &str = "/shipyard";

/// PascalCase logical id for `parts` joined together, e.g. `["dev", "DeployUser"]` -> `DevDeployUser`
pub fn logical_id(parts: &[&str]) -> String {
    parts.concat().to_upper_camel_case()
}

/// Stage name for an environment, e.g. `dev` -> `DevDeploy`
pub fn stage_name(environment: &str) -> String {
    logical_id(&[environment, "Deploy"])
}

/// Approval action name for an environment, e.g. `prod` -> `prod-approve`
pub fn approval_action_name(environment: &str) -> String {
    format!("{environment}Approve").to_kebab_case()
}

/// Physical (kebab-case) name for a logical id, e.g. `DevPipelineProject` -> `dev-pipeline-project`
pub fn physical_name(logical_id: &str) -> String {
    logical_id.to_kebab_case()
}

/// Parameter store path scoped to an environment
pub fn parameter_name(environment: &str, key: &str) -> String {
    format!("{PARAMETER_PREFIX}/{environment}/{key}")
}

/// Checks that a name can seed stage and resource names
pub fn is_valid_environment_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && name.chars().any(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_name() {
        assert_eq!(stage_name("dev"), "DevDeploy");
        assert_eq!(stage_name("prod"), "ProdDeploy");
        assert_eq!(stage_name("user-acceptance"), "UserAcceptanceDeploy");
    }

    #[test]
    fn test_approval_action_name() {
        assert_eq!(approval_action_name("prod"), "prod-approve");
    }

    #[test]
    fn test_physical_name() {
        assert_eq!(physical_name("DevPipelineProject"), "dev-pipeline-project");
    }

    #[test]
    fn test_parameter_name() {
        assert_eq!(
            parameter_name("dev", "access_key_id"),
            "/shipyard/dev/access_key_id"
        );
    }

    #[test]
    fn test_environment_name_validation() {
        assert!(is_valid_environment_name("dev"));
        assert!(is_valid_environment_name("uat_2"));
        assert!(!is_valid_environment_name(""));
        assert!(!is_valid_environment_name("--"));
        assert!(!is_valid_environment_name("prod env"));
        assert!(!is_valid_environment_name("prod/env"));
    }
}
