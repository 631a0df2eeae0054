//! Pipeline domain types

use serde::{Deserialize, Serialize};

use super::template::Token;

/// Name of the fixed first stage of every pipeline
pub const CHECKOUT_STAGE: &str = "Checkout";

/// Assembled pipeline: stage 0 is the checkout stage, then one stage per environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// Ordered group of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

/// A single pipeline action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ActionType", rename_all = "PascalCase")]
pub enum Action {
    #[serde(rename_all = "PascalCase")]
    S3Source {
        name: String,
        bucket: Token,
        bucket_key: String,
        output: String,
        trigger: SourceTrigger,
    },
    #[serde(rename_all = "PascalCase")]
    ManualApproval {
        name: String,
        run_order: u32,
        notification_topic: Token,
    },
    #[serde(rename_all = "PascalCase")]
    CodeBuild {
        name: String,
        project: Token,
        input: String,
        outputs: Vec<String>,
        run_order: u32,
    },
    #[serde(rename_all = "PascalCase")]
    S3Deploy {
        name: String,
        bucket: Token,
        input: String,
        object_key: String,
        extract: bool,
        run_order: u32,
    },
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Self::S3Source { name, .. }
            | Self::ManualApproval { name, .. }
            | Self::CodeBuild { name, .. }
            | Self::S3Deploy { name, .. } => name,
        }
    }

    pub fn run_order(&self) -> u32 {
        match self {
            Self::S3Source { .. } => 1,
            Self::ManualApproval { run_order, .. }
            | Self::CodeBuild { run_order, .. }
            | Self::S3Deploy { run_order, .. } => *run_order,
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, Self::ManualApproval { .. })
    }

    /// Short label used in listings
    pub fn kind(&self) -> &'static str {
        match self {
            Self::S3Source { .. } => "source",
            Self::ManualApproval { .. } => "approval",
            Self::CodeBuild { .. } => "build",
            Self::S3Deploy { .. } => "deploy",
        }
    }
}

/// How the source action detects new artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceTrigger {
    #[default]
    Events,
    Poll,
    None,
}

/// Build environment variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildVariable {
    #[serde(rename = "Type")]
    pub kind: BuildVariableKind,
    /// Literal value for plaintext variables, parameter name otherwise
    pub value: String,
}

impl BuildVariable {
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self {
            kind: BuildVariableKind::Plaintext,
            value: value.into(),
        }
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            kind: BuildVariableKind::ParameterStore,
            value: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildVariableKind {
    Plaintext,
    ParameterStore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_accessors() {
        let approval = Action::ManualApproval {
            name: "prod-approve".to_string(),
            run_order: 1,
            notification_topic: Token::reference("NotificationsTopic"),
        };
        let build = Action::CodeBuild {
            name: "Deploy".to_string(),
            project: Token::reference("ProdPipelineProject"),
            input: "S3Source".to_string(),
            outputs: vec!["ProdSource".to_string()],
            run_order: 2,
        };

        assert!(approval.is_approval());
        assert_eq!(approval.run_order(), 1);
        assert_eq!(build.name(), "Deploy");
        assert_eq!(build.kind(), "build");
        assert_eq!(build.run_order(), 2);
    }

    #[test]
    fn test_build_variable_serialization() {
        let value = serde_json::to_value(BuildVariable::parameter("/shipyard/dev/access_key_id"))
            .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "Type": "PARAMETER_STORE", "Value": "/shipyard/dev/access_key_id" })
        );
    }
}
