//! Error types for synthesis

use thiserror::Error;

/// Result type alias for synthesis operations
pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Configuration errors that abort synthesis
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Definition document could not be parsed
    #[error("Invalid definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),

    /// A pipeline needs at least one environment
    #[error("Pipeline must declare at least one environment")]
    NoEnvironments,

    /// Environment names derive stage and resource names
    #[error("Invalid environment name: {0:?}")]
    InvalidEnvironmentName(String),

    /// Two environments share a name
    #[error("Duplicate environment: {0}")]
    DuplicateEnvironment(String),

    /// Two resources were declared under the same logical id
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    /// Build spec is not a JSON object
    #[error("Build spec for environment {0} must be an object")]
    InvalidBuildSpec(String),

    /// Notification email failed validation
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Any other definition problem
    #[error("Validation error: {0}")]
    Validation(String),
}
