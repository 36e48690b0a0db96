//! Client configuration and its validation rules.
//!
//! A [`ContextCandidate`] is deliberately loose (headers are an arbitrary
//! JSON value, every field optional) so that it can be deserialized from
//! configuration files or assembled field by field. [`Context::validate`]
//! turns a candidate into a [`Context`], applying a fixed rule order where
//! the first violated rule wins. A stored `Context` is therefore always
//! fully valid; there is no partially-valid state.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;
use uuid::{Uuid, Variant};

use crate::transport::Transport;

/// Unvalidated client configuration.
///
/// Construct with a struct literal over [`ContextCandidate::default`], or
/// deserialize from a configuration source. The `transport` field is not
/// serializable and can only be set programmatically.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ContextCandidate {
    /// Tenant identifier; must be a UUIDv5 in hyphenated textual form.
    pub tenant: Option<String>,
    /// Default request headers. Kept as a loose JSON value so that the
    /// object-shape rule is checked at validation time, not at the type
    /// level.
    pub headers: Option<Value>,
    /// Base URI queries are sent to; must be an absolute URL when present.
    pub uri: Option<String>,
    /// Default query-string parameters merged into every request.
    pub params: Option<Map<String, Value>>,
    /// Injected HTTP transport. When absent, the built-in transport is
    /// used (see [`crate::transport`]).
    #[serde(skip)]
    pub transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for ContextCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextCandidate")
            .field("tenant", &self.tenant)
            .field("headers", &self.headers)
            .field("uri", &self.uri)
            .field("params", &self.params)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

/// Validated client configuration.
///
/// Field values are taken verbatim from the accepted candidate; the URI in
/// particular is validated but stored as the original string, not in a
/// normalized form.
#[derive(Clone)]
pub struct Context {
    tenant: String,
    headers: Map<String, Value>,
    uri: Option<String>,
    params: Map<String, Value>,
    transport: Option<Arc<dyn Transport>>,
}

/// A violated context validation rule.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("headers is a required field")]
    HeadersRequired,

    #[error("tenant is a required field")]
    TenantRequired,

    #[error("tenant must be a valid UUIDv5")]
    TenantNotUuidV5,

    #[error("uri must be a valid URL")]
    InvalidUri,

    #[error("headers must be an object, but the value was: {found}")]
    HeadersNotAnObject { found: Value },
}

impl Context {
    /// Validate a candidate and accept it as a context.
    ///
    /// Rules are applied in a fixed order and the first failure wins:
    /// headers present, tenant present, tenant is a UUIDv5, uri (when
    /// present) is an absolute URL, headers is an object. Transport
    /// callability needs no rule here; the `Arc<dyn Transport>` type
    /// guarantees it.
    ///
    /// # Errors
    ///
    /// Returns the [`ContextError`] for the first violated rule.
    pub fn validate(candidate: ContextCandidate) -> Result<Self, ContextError> {
        let ContextCandidate {
            tenant,
            headers,
            uri,
            params,
            transport,
        } = candidate;

        let headers = headers.ok_or(ContextError::HeadersRequired)?;

        let tenant = tenant
            .filter(|tenant| !tenant.is_empty())
            .ok_or(ContextError::TenantRequired)?;
        if !is_uuid_v5(&tenant) {
            return Err(ContextError::TenantNotUuidV5);
        }

        if let Some(uri) = &uri {
            let parsed = Url::parse(uri).map_err(|_| ContextError::InvalidUri)?;
            if !parsed.has_host() {
                return Err(ContextError::InvalidUri);
            }
        }

        let headers = match headers {
            Value::Object(map) => map,
            found => return Err(ContextError::HeadersNotAnObject { found }),
        };

        Ok(Self {
            tenant,
            headers,
            uri,
            params: params.unwrap_or_default(),
            transport,
        })
    }

    /// Tenant identifier.
    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Default request headers.
    #[must_use]
    pub const fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Base URI, when one was configured.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Default query-string parameters (empty when none were configured).
    #[must_use]
    pub const fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Injected transport, when one was configured.
    #[must_use]
    pub const fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.transport.as_ref()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("tenant", &self.tenant)
            .field("headers", &self.headers)
            .field("uri", &self.uri)
            .field("params", &self.params)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

/// Check the UUIDv5 textual form: 8-4-4-4-12 hyphenated hex groups with
/// version nibble `5` and an RFC 4122 variant, case-insensitive.
///
/// `Uuid::try_parse` also accepts braced, URN, and non-hyphenated forms;
/// comparing against the hyphenated rendering rejects those.
fn is_uuid_v5(value: &str) -> bool {
    let Ok(parsed) = Uuid::try_parse(value) else {
        return false;
    };
    parsed.get_version_num() == 5
        && matches!(parsed.get_variant(), Variant::RFC4122)
        && parsed
            .as_hyphenated()
            .to_string()
            .eq_ignore_ascii_case(value)
}
