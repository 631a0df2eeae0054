//! Shipyard Assembler
//!
//! Turns deployment definitions into resource templates.
//!
//! Synthesis is a single synchronous pass: the definition is validated, then
//! each part of the deployment declares its resources into a
//! [`TemplateBuilder`]. Either the whole template is produced or synthesis
//! fails with an [`AssemblyError`]; nothing is half declared.
//!
//! # Example
//!
//! ```
//! use shipyard_assembler::synthesize;
//! use shipyard_core::domain::deployment::DeploymentDefinition;
//!
//! let definition = DeploymentDefinition::from_json(r#"{
//!     "kind": "backend",
//!     "name": "orders",
//!     "pipeline": {
//!         "artifactsSourceKey": "builds/orders.zip",
//!         "environments": [{ "name": "dev", "buildSpec": { "version": 0.2 } }]
//!     },
//!     "notifications": {
//!         "target": { "targetType": "email", "emailAddress": "team@example.com" }
//!     }
//! }"#).unwrap();
//!
//! let synthesis = synthesize(&definition).unwrap();
//! assert_eq!(synthesis.pipeline.stage_names(), vec!["Checkout", "DevDeploy"]);
//! ```

pub mod buildspec;
pub mod credentials;
pub mod deployment;
pub mod distribution;
pub mod error;
pub mod frontend;
pub mod naming;
pub mod notification;
pub mod pipeline;
pub mod template;

// Re-export commonly used types
pub use deployment::{Synthesis, synthesize};
pub use error::{AssemblyError, Result};
pub use template::TemplateBuilder;
