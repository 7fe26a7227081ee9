use crate::codec::{decode_frame, encode_frame};
use crate::error::{ProviderError, Result, TransportError};
use crate::provider::SerialContextProvider;
use crate::transport::Transport;
use crate::wire::{RemoteRequest, RemoteResponse, WireValue};
use naming_core::{BoundValue, ContextMarker};
use std::collections::BTreeMap;

/// Client side of the remote path: every operation is one request/response exchange.
pub struct RemoteProviderClient<T> {
    transport: T,
    max_message_bytes: usize,
}

impl<T: Transport> RemoteProviderClient<T> {
    pub fn new(transport: T, max_message_bytes: usize) -> Self {
        Self {
            transport,
            max_message_bytes,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call(&self, request: &RemoteRequest) -> Result<RemoteResponse> {
        let frame = encode_frame(request, self.max_message_bytes)?;
        let reply = self.transport.round_trip(frame).map_err(|err| {
            tracing::debug!(
                target = "naming.provider",
                operation = request.operation(),
                error = %err,
                "remote call failed"
            );
            err
        })?;
        match decode_frame::<RemoteResponse>(&reply, self.max_message_bytes)? {
            RemoteResponse::Failed(err) => Err(ProviderError::Naming(err)),
            response => Ok(response),
        }
    }

    fn call_done(&self, request: RemoteRequest) -> Result<()> {
        match self.call(&request)? {
            RemoteResponse::Done => Ok(()),
            other => Err(unexpected(request.operation(), &other)),
        }
    }
}

fn unexpected(operation: &str, response: &RemoteResponse) -> ProviderError {
    ProviderError::Transport(TransportError::UnexpectedResponse {
        message: format!("{operation} answered with {response:?}"),
    })
}

impl<T: Transport> SerialContextProvider for RemoteProviderClient<T> {
    fn lookup(&self, name: &str) -> Result<BoundValue> {
        let request = RemoteRequest::Lookup {
            name: name.to_owned(),
        };
        match self.call(&request)? {
            RemoteResponse::Value(value) => Ok(value.into_bound()),
            other => Err(unexpected(request.operation(), &other)),
        }
    }

    fn bind(&self, name: &str, value: BoundValue) -> Result<()> {
        let value = WireValue::from_bound(name, &value)?;
        self.call_done(RemoteRequest::Bind {
            name: name.to_owned(),
            value,
        })
    }

    fn rebind(&self, name: &str, value: BoundValue) -> Result<()> {
        let value = WireValue::from_bound(name, &value)?;
        self.call_done(RemoteRequest::Rebind {
            name: name.to_owned(),
            value,
        })
    }

    fn unbind(&self, name: &str) -> Result<()> {
        self.call_done(RemoteRequest::Unbind {
            name: name.to_owned(),
        })
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.call_done(RemoteRequest::Rename {
            old_name: old_name.to_owned(),
            new_name: new_name.to_owned(),
        })
    }

    fn list(&self, name: &str) -> Result<BTreeMap<String, BoundValue>> {
        let request = RemoteRequest::List {
            name: name.to_owned(),
        };
        match self.call(&request)? {
            RemoteResponse::Listing(entries) => Ok(entries
                .into_iter()
                .map(|(key, value)| (key, value.into_bound()))
                .collect()),
            other => Err(unexpected(request.operation(), &other)),
        }
    }

    fn create_subcontext(&self, name: &str) -> Result<ContextMarker> {
        let request = RemoteRequest::CreateSubcontext {
            name: name.to_owned(),
        };
        match self.call(&request)? {
            RemoteResponse::Subcontext(marker) => Ok(marker),
            other => Err(unexpected(request.operation(), &other)),
        }
    }

    fn destroy_subcontext(&self, name: &str) -> Result<()> {
        self.call_done(RemoteRequest::DestroySubcontext {
            name: name.to_owned(),
        })
    }
}
