//! The client type and query executor.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::context::{Context, ContextCandidate, ContextError};
use crate::request;
use crate::transport::{self, BoxError};

/// Errors surfaced by [`ArthurClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The stored or override context failed validation.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The query payload was not a JSON object.
    #[error("query should be an object")]
    PayloadNotAnObject,

    /// A configured header value was an array or an object.
    #[error("Headers cannot be arrays, functions or objects")]
    NonScalarHeader,

    /// The effective context has no base URI to send the query to.
    #[error("uri is not set on the context")]
    MissingUri,

    /// The merged parameters could not be encoded into a query string.
    #[error("failed to encode query parameters: {0}")]
    EncodeParams(#[from] serde_qs::Error),

    /// No transport could be resolved at the moment the request was about
    /// to be sent.
    #[error("no default HTTP transport is available and no custom transport was provided")]
    TransportUnavailable,

    /// The request completed with a non-success status.
    #[error("{status} ({status_text})")]
    Status { status: u16, status_text: String },

    /// A transport-level failure, passed through unmodified.
    #[error("{0}")]
    Transport(BoxError),

    /// The response body was not valid JSON, passed through unmodified.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Client issuing tenant-scoped read queries.
///
/// The stored [`Context`] is replaced wholesale by [`set_context`]; each
/// query snapshots it once, so a concurrent replacement is observed either
/// entirely or not at all.
///
/// [`set_context`]: ArthurClient::set_context
pub struct ArthurClient {
    context: RwLock<Arc<Context>>,
}

impl ArthurClient {
    /// Validate a candidate context and construct a client around it.
    ///
    /// # Errors
    ///
    /// Returns the first violated validation rule.
    pub fn new(candidate: ContextCandidate) -> Result<Self, ContextError> {
        let context = Context::validate(candidate)?;
        Ok(Self {
            context: RwLock::new(Arc::new(context)),
        })
    }

    /// Snapshot of the stored context.
    #[must_use]
    pub fn context(&self) -> Context {
        self.snapshot().as_ref().clone()
    }

    /// Validate a candidate and install it as the new context.
    ///
    /// Replacement is atomic and wholesale; nothing of the previous
    /// context is retained. On a validation failure the previous context
    /// stays in place untouched.
    ///
    /// # Errors
    ///
    /// Returns the first violated validation rule.
    pub fn set_context(&self, candidate: ContextCandidate) -> Result<(), ContextError> {
        let context = Context::validate(candidate)?;
        *self
            .context
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(context);
        Ok(())
    }

    /// Execute a query against the stored context.
    ///
    /// # Errors
    ///
    /// See [`ClientError`]; transport and JSON-parse failures pass through
    /// unmodified.
    pub async fn query(&self, payload: &Value) -> Result<Value, ClientError> {
        let context = self.snapshot();
        self.execute(payload, &context).await
    }

    /// Execute a query against a one-off context override.
    ///
    /// The override is validated exactly like a stored context and is used
    /// for this call only; the stored context is not touched. An invalid
    /// override fails the call rather than falling back.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    pub async fn query_with_context(
        &self,
        payload: &Value,
        context: ContextCandidate,
    ) -> Result<Value, ClientError> {
        let context = Context::validate(context)?;
        self.execute(payload, &context).await
    }

    fn snapshot(&self) -> Arc<Context> {
        Arc::clone(&self.context.read().unwrap_or_else(PoisonError::into_inner))
    }

    async fn execute(&self, payload: &Value, context: &Context) -> Result<Value, ClientError> {
        if !payload.is_object() {
            return Err(ClientError::PayloadNotAnObject);
        }

        // Everything that can fail without the network fails here, before
        // a transport is even resolved.
        let url = request::build_url(context, payload)?;
        let headers = request::effective_headers(context.headers(), context.tenant())?;

        let transport = match context.transport() {
            Some(transport) => Arc::clone(transport),
            None => transport::default_transport().ok_or(ClientError::TransportUnavailable)?,
        };

        debug!(url = %url, tenant = %context.tenant(), "sending query");
        let response = transport
            .get(&url, &headers)
            .await
            .map_err(ClientError::Transport)?;

        if !response.is_success() {
            warn!(status = response.status(), "query rejected by server");
            return Err(ClientError::Status {
                status: response.status(),
                status_text: response.status_text().to_string(),
            });
        }

        Ok(response.into_json()?)
    }
}

impl fmt::Debug for ArthurClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArthurClient")
            .field("context", &self.snapshot())
            .finish()
    }
}
