//! Workflow type registry.
//!
//! The registry is built once at startup from the application's workflow
//! models and is read-only afterwards, so it can be shared between any
//! number of clients and tasks behind an `Arc` without locking.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::encoded::TypeDescriptor;
use crate::error::RegistryError;
use crate::types::{StateDescriptor, Workflow, WorkflowTypeModel};

/// Immutable map of workflow type name to its model
#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: HashMap<String, WorkflowTypeModel>,
}

impl Registry {
    /// Build a registry from workflow models.
    ///
    /// Fails if two models share a workflow type name.
    pub fn build(
        models: impl IntoIterator<Item = WorkflowTypeModel>,
    ) -> Result<Self, RegistryError> {
        let mut by_type = HashMap::new();
        for model in models {
            match by_type.entry(model.workflow_type().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(RegistryError::DuplicateWorkflowType(entry.key().clone()))
                }
                Entry::Vacant(entry) => {
                    entry.insert(model);
                }
            }
        }
        Ok(Self { models: by_type })
    }

    /// Build a registry from application-side workflow definitions
    pub fn from_workflows(workflows: &[&dyn Workflow]) -> Result<Self, RegistryError> {
        let models = workflows
            .iter()
            .map(|workflow| WorkflowTypeModel::from_workflow(*workflow))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(models)
    }

    pub fn model(&self, workflow_type: &str) -> Option<&WorkflowTypeModel> {
        self.models.get(workflow_type)
    }

    pub fn state_descriptor(&self, workflow_type: &str, state_id: &str) -> Option<&StateDescriptor> {
        self.model(workflow_type)?.state(state_id)
    }

    pub fn signal_channels(&self, workflow_type: &str) -> Option<&HashMap<String, TypeDescriptor>> {
        self.model(workflow_type).map(WorkflowTypeModel::signal_channels)
    }

    pub fn signal_type(&self, workflow_type: &str, channel_name: &str) -> Option<&TypeDescriptor> {
        self.model(workflow_type)?.signal_type(channel_name)
    }

    pub fn query_attributes(
        &self,
        workflow_type: &str,
    ) -> Option<&HashMap<String, TypeDescriptor>> {
        self.model(workflow_type).map(WorkflowTypeModel::query_attributes)
    }

    pub fn query_attribute_type(&self, workflow_type: &str, key: &str) -> Option<&TypeDescriptor> {
        self.model(workflow_type)?.query_attribute_type(key)
    }

    /// Registered workflow type names, in no particular order
    pub fn workflow_types(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
