use crate::codec::{decode_frame, encode_frame};
use crate::error::{ProviderError, Result, TransportError};
use crate::factory::ObjectFactories;
use crate::local::LocalSerialContextProvider;
use crate::provider::SerialContextProvider;
use crate::serial::SerialContext;
use crate::wire::{RemoteRequest, RemoteResponse, WireValue};
use naming_core::{BoundValue, ContextMarker, NamingError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Server side of the remote path.
///
/// Everything handed back must cross a process boundary, so deferred proxies are materialized
/// here and listings drop whatever cannot be serialized.
pub struct RemoteSerialContextProvider {
    local: Arc<LocalSerialContextProvider>,
    context: SerialContext,
    max_message_bytes: usize,
}

impl RemoteSerialContextProvider {
    pub fn new(
        local: Arc<LocalSerialContextProvider>,
        factories: Arc<ObjectFactories>,
        max_message_bytes: usize,
    ) -> Self {
        let provider: Arc<dyn SerialContextProvider> = local.clone();
        Self {
            local,
            context: SerialContext::new(provider, factories),
            max_message_bytes,
        }
    }

    /// Dispatches one request. Naming failures become [`RemoteResponse::Failed`].
    pub fn handle(&self, request: RemoteRequest) -> RemoteResponse {
        let operation = request.operation();
        let outcome = match request {
            RemoteRequest::Lookup { name } => self
                .lookup(&name)
                .and_then(|value| Ok(WireValue::from_bound(&name, &value)?))
                .map(RemoteResponse::Value),
            RemoteRequest::Bind { name, value } => {
                self.bind(&name, value.into_bound()).map(|()| RemoteResponse::Done)
            }
            RemoteRequest::Rebind { name, value } => self
                .rebind(&name, value.into_bound())
                .map(|()| RemoteResponse::Done),
            RemoteRequest::Unbind { name } => self.unbind(&name).map(|()| RemoteResponse::Done),
            RemoteRequest::Rename { old_name, new_name } => self
                .rename(&old_name, &new_name)
                .map(|()| RemoteResponse::Done),
            RemoteRequest::List { name } => self.list(&name).and_then(|entries| {
                let listing = entries
                    .into_iter()
                    .map(|(key, value)| Ok((key.clone(), WireValue::from_bound(&key, &value)?)))
                    .collect::<std::result::Result<Vec<_>, NamingError>>()?;
                Ok(RemoteResponse::Listing(listing))
            }),
            RemoteRequest::CreateSubcontext { name } => {
                self.create_subcontext(&name).map(RemoteResponse::Subcontext)
            }
            RemoteRequest::DestroySubcontext { name } => self
                .destroy_subcontext(&name)
                .map(|()| RemoteResponse::Done),
        };
        match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(target = "naming.provider", operation, error = %err, "remote request failed");
                RemoteResponse::Failed(err.into())
            }
        }
    }

    /// Decodes a request frame, handles it and encodes the response.
    pub fn handle_frame(&self, frame: &[u8]) -> std::result::Result<Vec<u8>, TransportError> {
        let request: RemoteRequest = decode_frame(frame, self.max_message_bytes)?;
        let response = self.handle(request);
        encode_frame(&response, self.max_message_bytes)
    }
}

impl SerialContextProvider for RemoteSerialContextProvider {
    fn lookup(&self, name: &str) -> Result<BoundValue> {
        let deferred = match self.local.lookup(name)? {
            BoundValue::Deferred(deferred) => deferred,
            value => return Ok(value),
        };
        let object = deferred.create(&self.context)?;
        if !deferred.relookup_after_create() {
            return Ok(BoundValue::Object(object));
        }
        // The proxy rebinds the real object while initializing; hand out that binding.
        match self.local.lookup(name)? {
            BoundValue::Deferred(_) => Err(ProviderError::Naming(NamingError::other(format!(
                "{name} is still a proxy after initialization"
            )))),
            value => Ok(value),
        }
    }

    fn bind(&self, name: &str, value: BoundValue) -> Result<()> {
        self.local.bind(name, value)
    }

    fn rebind(&self, name: &str, value: BoundValue) -> Result<()> {
        self.local.rebind(name, value)
    }

    fn unbind(&self, name: &str) -> Result<()> {
        self.local.unbind(name)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.local.rename(old_name, new_name)
    }

    fn list(&self, name: &str) -> Result<BTreeMap<String, BoundValue>> {
        let mut entries = self.local.list(name)?;
        entries.retain(|key, value| {
            let keep = value.is_serializable();
            if !keep {
                tracing::trace!(
                    target = "naming.provider",
                    context = name,
                    name = %key,
                    class = %value.class_name(),
                    "omitting non-serializable binding from remote listing"
                );
            }
            keep
        });
        Ok(entries)
    }

    fn create_subcontext(&self, name: &str) -> Result<ContextMarker> {
        self.local.create_subcontext(name)
    }

    fn destroy_subcontext(&self, name: &str) -> Result<()> {
        self.local.destroy_subcontext(name)
    }
}
