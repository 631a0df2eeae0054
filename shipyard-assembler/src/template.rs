//! Template builder
//!
//! Collects declared resources under unique logical ids. Name collisions
//! (for example two environments with the same name) surface here as
//! [`AssemblyError::DuplicateResource`] instead of a broken template.

use std::collections::BTreeMap;

use shipyard_core::domain::template::{Output, Resource, Template, Token};

use crate::error::{AssemblyError, Result};

#[derive(Debug, Default)]
pub struct TemplateBuilder {
    description: String,
    resources: BTreeMap<String, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl TemplateBuilder {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    /// Declares a resource and returns a reference to it
    pub fn add(&mut self, logical_id: impl Into<String>, resource: Resource) -> Result<Token> {
        let logical_id = logical_id.into();
        if self.resources.contains_key(&logical_id) {
            return Err(AssemblyError::DuplicateResource(logical_id));
        }

        tracing::debug!("Declared {} {}", resource.type_name(), logical_id);
        self.resources.insert(logical_id.clone(), resource);

        Ok(Token::Ref(logical_id))
    }

    pub fn output(&mut self, name: impl Into<String>, value: Token, description: Option<&str>) {
        self.outputs.insert(
            name.into(),
            Output {
                value,
                description: description.map(str::to_string),
            },
        );
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn build(self) -> Template {
        Template {
            description: self.description,
            resources: self.resources,
            outputs: self.outputs,
        }
    }
}
