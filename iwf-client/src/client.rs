//! Client implementation for the iWF workflow service.
//!
//! Every operation validates its arguments against the [`Registry`] first,
//! then issues exactly one call to the [`WorkflowService`], then shapes the
//! response. A call that fails validation never reaches the server.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use iwf_core::{
    DecodedValue, JsonPayloadCodec, PayloadCodec, PayloadCodecExt, Registry, TransportError,
    WorkflowTypeModel,
};
use iwf_proto::{
    StateCompletionOutput, WorkflowGetQueryAttributesRequest, WorkflowGetRequest,
    WorkflowService, WorkflowSignalRequest, WorkflowStartRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::http::HttpWorkflowServiceClient;
use crate::options::{ClientOptions, WorkflowStartOptions};
use crate::reset::ResetSpec;

/// Service stub the client talks to
pub type SharedWorkflowService = Arc<dyn WorkflowService<Error = TransportError> + Send + Sync>;

/// Typed, registry-validated iWF client.
///
/// Cloning is cheap and clones share the registry, codec and service.
#[derive(Clone)]
pub struct Client {
    registry: Arc<Registry>,
    service: SharedWorkflowService,
    codec: Arc<dyn PayloadCodec>,
    options: ClientOptions,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("service", &"<dyn WorkflowService>")
            .field("codec", &"<dyn PayloadCodec>")
            .finish()
    }
}

impl Client {
    /// Create a client on top of an existing service
    pub fn new(
        registry: Arc<Registry>,
        service: SharedWorkflowService,
        options: ClientOptions,
    ) -> Self {
        Self {
            registry,
            service,
            codec: Arc::new(JsonPayloadCodec),
            options,
        }
    }

    /// Create a client talking HTTP to `options.server_url`
    pub fn connect(registry: Arc<Registry>, options: ClientOptions) -> ClientResult<Self> {
        let service = Arc::new(HttpWorkflowServiceClient::new(&options)?);
        Ok(Self::new(registry, service, options))
    }

    /// Replace the payload codec
    pub fn with_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Start a workflow from `start_state_id` with `input` as state input.
    ///
    /// Returns the run id of the new workflow run.
    pub async fn start_workflow<I: Serialize + ?Sized>(
        &self,
        workflow_type: &str,
        start_state_id: &str,
        input: &I,
        workflow_id: &str,
        options: &WorkflowStartOptions,
    ) -> ClientResult<String> {
        self.ensure_start_state(workflow_type, start_state_id)?;
        let state_input = self.codec.encode(Some(input))?;
        self.do_start_workflow(workflow_type, start_state_id, state_input, workflow_id, options)
            .await
    }

    /// Start a workflow whose start state takes no input
    pub async fn start_workflow_without_input(
        &self,
        workflow_type: &str,
        start_state_id: &str,
        workflow_id: &str,
        options: &WorkflowStartOptions,
    ) -> ClientResult<String> {
        self.ensure_start_state(workflow_type, start_state_id)?;
        self.do_start_workflow(workflow_type, start_state_id, None, workflow_id, options)
            .await
    }

    fn ensure_start_state(&self, workflow_type: &str, start_state_id: &str) -> ClientResult<()> {
        match self.registry.state_descriptor(workflow_type, start_state_id) {
            Some(state) if state.can_start => Ok(()),
            _ => {
                warn!(workflow_type, start_state_id, "rejecting start: invalid start state");
                Err(ClientError::InvalidStartState {
                    workflow_type: workflow_type.to_string(),
                    state_id: start_state_id.to_string(),
                })
            }
        }
    }

    async fn do_start_workflow(
        &self,
        workflow_type: &str,
        start_state_id: &str,
        state_input: Option<String>,
        workflow_id: &str,
        options: &WorkflowStartOptions,
    ) -> ClientResult<String> {
        let request = WorkflowStartRequest {
            workflow_id: workflow_id.to_string(),
            iwf_worker_url: self.options.worker_url.clone(),
            iwf_workflow_type: workflow_type.to_string(),
            workflow_timeout_seconds: options.workflow_timeout_seconds,
            state_input,
            start_state_id: start_state_id.to_string(),
        };

        let response = self.service.start_workflow(request).await?;
        info!(
            workflow_type,
            workflow_id,
            run_id = %response.workflow_run_id,
            "workflow started"
        );
        Ok(response.workflow_run_id)
    }

    /// Wait for a workflow that completes in at most one state and decode
    /// that state's output.
    ///
    /// Returns `None` when the workflow completed without any completion
    /// state. Fails if it completed in several states, or if the single
    /// completion state has no output.
    pub async fn get_simple_workflow_result_with_wait<T: DeserializeOwned>(
        &self,
        workflow_id: &str,
        run_id: Option<&str>,
    ) -> ClientResult<Option<T>> {
        let results = self.get_results_with_wait(workflow_id, run_id).await?;

        let output = match results.as_slice() {
            [] => return Ok(None),
            [single] => single,
            many => {
                return Err(ClientError::MultipleCompletionStates {
                    workflow_id: workflow_id.to_string(),
                    state_ids: many
                        .iter()
                        .map(|output| output.completed_state_id.clone())
                        .collect(),
                })
            }
        };

        let raw = output
            .completed_state_output
            .as_deref()
            .ok_or_else(|| ClientError::MissingOutput {
                workflow_id: workflow_id.to_string(),
                state_id: output.completed_state_id.clone(),
            })?;
        Ok(Some(self.codec.decode_as(raw)?))
    }

    /// Wait for a workflow and return the outputs of all its completion
    /// states, undecoded.
    pub async fn get_complex_workflow_result_with_wait(
        &self,
        workflow_id: &str,
        run_id: Option<&str>,
    ) -> ClientResult<Vec<StateCompletionOutput>> {
        self.get_results_with_wait(workflow_id, run_id).await
    }

    async fn get_results_with_wait(
        &self,
        workflow_id: &str,
        run_id: Option<&str>,
    ) -> ClientResult<Vec<StateCompletionOutput>> {
        let request = WorkflowGetRequest {
            workflow_id: workflow_id.to_string(),
            workflow_run_id: run_id.unwrap_or_default().to_string(),
            needs_results: true,
        };

        debug!(workflow_id, ?run_id, "waiting for workflow result");
        let response = self.service.get_workflow_with_wait(request).await?;
        let results = response.results.unwrap_or_default();
        debug!(workflow_id, completed_states = results.len(), "workflow result received");
        Ok(results)
    }

    /// Send `value` to the workflow's `channel_name` signal channel.
    ///
    /// The value's type must be exactly the type registered for the channel.
    pub async fn signal_workflow<T: Serialize + ?Sized + 'static>(
        &self,
        workflow_type: &str,
        workflow_id: &str,
        run_id: Option<&str>,
        channel_name: &str,
        value: &T,
    ) -> ClientResult<()> {
        let model = self.registered_model(workflow_type)?;

        let Some(expected) = model.signal_type(channel_name) else {
            warn!(workflow_type, channel_name, "rejecting signal: unknown channel");
            return Err(ClientError::SignalChannelNotRegistered {
                workflow_type: workflow_type.to_string(),
                channel_name: channel_name.to_string(),
            });
        };
        if !expected.accepts::<T>() {
            warn!(workflow_type, channel_name, expected = %expected, "rejecting signal: type mismatch");
            return Err(ClientError::SignalTypeMismatch {
                channel_name: channel_name.to_string(),
                expected: expected.type_name(),
                actual: type_name::<T>(),
            });
        }

        let request = WorkflowSignalRequest {
            workflow_id: workflow_id.to_string(),
            workflow_run_id: run_id.unwrap_or_default().to_string(),
            signal_channel_name: channel_name.to_string(),
            signal_value: self.codec.encode(Some(value))?,
        };

        self.service.signal_workflow(request).await?;
        info!(workflow_type, workflow_id, channel_name, "workflow signaled");
        Ok(())
    }

    /// Reset a workflow run, returning the id of the new run.
    ///
    /// The fields carried by `reset` are forwarded as-is; the server
    /// validates them.
    pub async fn reset_workflow(
        &self,
        workflow_id: &str,
        run_id: Option<&str>,
        reset: ResetSpec,
        reason: &str,
        skip_signal_reapply: bool,
    ) -> ClientResult<String> {
        let reset_type = reset.reset_type();
        let request = reset.into_request(
            workflow_id.to_string(),
            run_id.unwrap_or_default().to_string(),
            reason.to_string(),
            skip_signal_reapply,
        );

        let response = self.service.reset_workflow(request).await?;
        info!(
            workflow_id,
            ?reset_type,
            new_run_id = %response.workflow_run_id,
            "workflow reset"
        );
        Ok(response.workflow_run_id)
    }

    /// Read the given query attributes.
    ///
    /// Every key must be registered for the workflow type. An empty key
    /// list reads all attributes, like [`Client::get_all_query_attributes`].
    pub async fn get_workflow_query_attributes<K: AsRef<str>>(
        &self,
        workflow_type: &str,
        workflow_id: &str,
        run_id: Option<&str>,
        keys: &[K],
    ) -> ClientResult<QueryAttributes> {
        let keys: Vec<String> = keys.iter().map(|key| key.as_ref().to_string()).collect();
        let keys = (!keys.is_empty()).then_some(keys);
        self.do_get_query_attributes(workflow_type, workflow_id, run_id, keys)
            .await
    }

    /// Read every query attribute the workflow has set
    pub async fn get_all_query_attributes(
        &self,
        workflow_type: &str,
        workflow_id: &str,
        run_id: Option<&str>,
    ) -> ClientResult<QueryAttributes> {
        self.do_get_query_attributes(workflow_type, workflow_id, run_id, None)
            .await
    }

    async fn do_get_query_attributes(
        &self,
        workflow_type: &str,
        workflow_id: &str,
        run_id: Option<&str>,
        keys: Option<Vec<String>>,
    ) -> ClientResult<QueryAttributes> {
        let model = self.registered_model(workflow_type)?;

        if let Some(keys) = &keys {
            let unknown: Vec<String> = keys
                .iter()
                .filter(|key| model.query_attribute_type(key).is_none())
                .cloned()
                .collect();
            if !unknown.is_empty() {
                warn!(workflow_type, ?unknown, "rejecting query: unknown attributes");
                return Err(ClientError::UnknownQueryAttributes {
                    workflow_type: workflow_type.to_string(),
                    keys: unknown,
                });
            }
        }

        let request = WorkflowGetQueryAttributesRequest {
            workflow_id: workflow_id.to_string(),
            workflow_run_id: run_id.unwrap_or_default().to_string(),
            attribute_keys: keys,
        };

        let response = self.service.get_query_attributes(request).await?;
        let attributes = response.query_attributes.ok_or_else(|| {
            ClientError::MalformedServerResponse("query attributes not returned".to_string())
        })?;

        let mut values = HashMap::with_capacity(attributes.len());
        for attribute in attributes {
            // unset attributes come back without a value
            let Some(raw) = attribute.value else {
                continue;
            };
            let value_type = model.query_attribute_type(&attribute.key).ok_or_else(|| {
                ClientError::MalformedServerResponse(format!(
                    "server returned unregistered query attribute {}",
                    attribute.key
                ))
            })?;
            let value = self.codec.decode(&raw, value_type)?;
            values.insert(attribute.key, value);
        }

        debug!(workflow_type, workflow_id, returned = values.len(), "query attributes read");
        Ok(QueryAttributes { values })
    }

    fn registered_model(&self, workflow_type: &str) -> ClientResult<&WorkflowTypeModel> {
        self.registry.model(workflow_type).ok_or_else(|| {
            warn!(workflow_type, "workflow type is not registered");
            ClientError::workflow_type_not_registered(workflow_type)
        })
    }
}

/// Decoded query attribute values, keyed by attribute key.
///
/// Each value has the type registered for its key; read it back with
/// [`QueryAttributes::get`].
#[derive(Default)]
pub struct QueryAttributes {
    values: HashMap<String, DecodedValue>,
}

impl QueryAttributes {
    /// Get the value of `key` as `T`.
    ///
    /// Returns `None` if the key is absent or `T` is not its registered type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.downcast_ref::<T>()
    }

    /// Remove and return the value of `key` as `T`
    pub fn take<T: 'static>(&mut self, key: &str) -> Option<T> {
        let value = self.values.remove(key)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                self.values.insert(key.to_string(), value);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for QueryAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
