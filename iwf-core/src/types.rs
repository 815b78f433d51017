//! Workflow type models.
//!
//! A [`WorkflowTypeModel`] is the local declaration of one workflow type:
//! its states, the signal channels it accepts and the query attributes it
//! exposes. Models are built once and never change afterwards.

use serde::de::DeserializeOwned;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::encoded::TypeDescriptor;
use crate::error::RegistryError;

/// A state of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateDescriptor {
    pub id: String,
    /// Whether the workflow may be started from this state
    pub can_start: bool,
}

impl StateDescriptor {
    pub fn new(id: impl Into<String>, can_start: bool) -> Self {
        Self {
            id: id.into(),
            can_start,
        }
    }

    /// A state that can be used as the start state
    pub fn starting(id: impl Into<String>) -> Self {
        Self::new(id, true)
    }

    /// A state that can only be reached from other states
    pub fn non_starting(id: impl Into<String>) -> Self {
        Self::new(id, false)
    }
}

/// Signal channel declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalChannelDef {
    pub name: String,
    pub value_type: TypeDescriptor,
}

impl SignalChannelDef {
    pub fn new<T>(name: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            value_type: TypeDescriptor::of::<T>(),
        }
    }
}

/// Query attribute declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAttributeDef {
    pub key: String,
    pub value_type: TypeDescriptor,
}

impl QueryAttributeDef {
    pub fn new<T>(key: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            value_type: TypeDescriptor::of::<T>(),
        }
    }
}

/// Application-side workflow definition.
///
/// Implement this for each workflow the application runs and hand the
/// definitions to `Registry::from_workflows`.
pub trait Workflow: Send + Sync {
    /// Unique workflow type name
    fn workflow_type(&self) -> &str;

    fn states(&self) -> Vec<StateDescriptor>;

    fn signal_channels(&self) -> Vec<SignalChannelDef> {
        Vec::new()
    }

    fn query_attributes(&self) -> Vec<QueryAttributeDef> {
        Vec::new()
    }
}

/// Immutable model of one workflow type
#[derive(Debug, Clone)]
pub struct WorkflowTypeModel {
    workflow_type: String,
    states: Vec<StateDescriptor>,
    signal_channels: HashMap<String, TypeDescriptor>,
    query_attributes: HashMap<String, TypeDescriptor>,
}

impl WorkflowTypeModel {
    pub fn builder(workflow_type: impl Into<String>) -> WorkflowTypeModelBuilder {
        WorkflowTypeModelBuilder {
            workflow_type: workflow_type.into(),
            states: Vec::new(),
            signal_channels: Vec::new(),
            query_attributes: Vec::new(),
        }
    }

    /// Build the model of an application-side workflow definition
    pub fn from_workflow(workflow: &dyn Workflow) -> Result<Self, RegistryError> {
        let mut builder = Self::builder(workflow.workflow_type());
        builder.states = workflow.states();
        builder.signal_channels = workflow.signal_channels();
        builder.query_attributes = workflow.query_attributes();
        builder.build()
    }

    pub fn workflow_type(&self) -> &str {
        &self.workflow_type
    }

    /// States in declaration order
    pub fn states(&self) -> &[StateDescriptor] {
        &self.states
    }

    pub fn state(&self, state_id: &str) -> Option<&StateDescriptor> {
        self.states.iter().find(|state| state.id == state_id)
    }

    pub fn signal_channels(&self) -> &HashMap<String, TypeDescriptor> {
        &self.signal_channels
    }

    pub fn signal_type(&self, channel_name: &str) -> Option<&TypeDescriptor> {
        self.signal_channels.get(channel_name)
    }

    pub fn query_attributes(&self) -> &HashMap<String, TypeDescriptor> {
        &self.query_attributes
    }

    pub fn query_attribute_type(&self, key: &str) -> Option<&TypeDescriptor> {
        self.query_attributes.get(key)
    }
}

/// Builder for [`WorkflowTypeModel`]
#[derive(Debug, Clone)]
pub struct WorkflowTypeModelBuilder {
    workflow_type: String,
    states: Vec<StateDescriptor>,
    signal_channels: Vec<SignalChannelDef>,
    query_attributes: Vec<QueryAttributeDef>,
}

impl WorkflowTypeModelBuilder {
    pub fn state(mut self, state: StateDescriptor) -> Self {
        self.states.push(state);
        self
    }

    /// Declare a signal channel whose values are of type `T`
    pub fn signal_channel<T>(mut self, name: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.signal_channels.push(SignalChannelDef::new::<T>(name));
        self
    }

    /// Declare a query attribute whose values are of type `T`
    pub fn query_attribute<T>(mut self, key: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.query_attributes.push(QueryAttributeDef::new::<T>(key));
        self
    }

    /// Finish the model.
    ///
    /// State ids, signal channel names and query attribute keys must each be
    /// unique. Startability is not checked here.
    pub fn build(self) -> Result<WorkflowTypeModel, RegistryError> {
        let workflow_type = self.workflow_type;

        let mut seen_states = HashSet::new();
        for state in &self.states {
            if !seen_states.insert(state.id.as_str()) {
                return Err(RegistryError::DuplicateState {
                    workflow_type,
                    state_id: state.id.clone(),
                });
            }
        }

        let mut signal_channels = HashMap::with_capacity(self.signal_channels.len());
        for def in self.signal_channels {
            match signal_channels.entry(def.name) {
                Entry::Occupied(entry) => {
                    return Err(RegistryError::DuplicateSignalChannel {
                        workflow_type,
                        channel_name: entry.key().clone(),
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(def.value_type);
                }
            }
        }

        let mut query_attributes = HashMap::with_capacity(self.query_attributes.len());
        for def in self.query_attributes {
            match query_attributes.entry(def.key) {
                Entry::Occupied(entry) => {
                    return Err(RegistryError::DuplicateQueryAttribute {
                        workflow_type,
                        key: entry.key().clone(),
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(def.value_type);
                }
            }
        }

        Ok(WorkflowTypeModel {
            workflow_type,
            states: self.states,
            signal_channels,
            query_attributes,
        })
    }
}
