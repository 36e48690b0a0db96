//! Outgoing request assembly: parameter merging, header sanitization, and
//! URL construction.
//!
//! The query string uses a nested-object/array-aware encoding (bracketed
//! key paths, indexed arrays) whose decoder is its exact inverse; booleans
//! and numbers serialize as their literal text form.

use serde_json::{Map, Value};

use crate::client::ClientError;
use crate::context::Context;

/// Header carrying the tenant identifier. Appended after all configured
/// headers so that a caller-supplied header of the same name cannot win.
pub const TENANT_HEADER: &str = "arthur-tenant-key";

/// Merge the context's default parameters with the per-call payload.
///
/// The payload always becomes the `query` parameter, displacing any
/// default of that name; all other defaults pass through unchanged.
pub(crate) fn effective_params(defaults: &Map<String, Value>, payload: &Value) -> Map<String, Value> {
    let mut params = defaults.clone();
    params.remove("query");
    params.insert("query".to_string(), payload.clone());
    params
}

/// Build the full request target: `<base uri>?<encoded parameters>`.
///
/// # Errors
///
/// Fails when the context has no `uri`, or when the merged parameters
/// cannot be encoded.
pub(crate) fn build_url(context: &Context, payload: &Value) -> Result<String, ClientError> {
    let base = context.uri().ok_or(ClientError::MissingUri)?;
    let params = effective_params(context.params(), payload);
    let query_string = serde_qs::to_string(&params)?;
    Ok(format!("{base}?{query_string}"))
}

/// Sanitize the configured headers and append the tenant header.
///
/// Only scalar values are permitted. Strings pass through as-is; other
/// scalars take their JSON text form. Both name and value are then
/// percent-encoded as URI components. The tenant header is appended last,
/// unencoded (tenant identifiers are plain UUID text).
///
/// # Errors
///
/// Fails on any array or object header value, before a request is made.
pub(crate) fn effective_headers(
    headers: &Map<String, Value>,
    tenant: &str,
) -> Result<Vec<(String, String)>, ClientError> {
    let mut sanitized = Vec::with_capacity(headers.len() + 1);
    for (name, value) in headers {
        let text = match value {
            Value::Array(_) | Value::Object(_) => return Err(ClientError::NonScalarHeader),
            Value::String(text) => text.clone(),
            scalar => scalar.to_string(),
        };
        sanitized.push((
            urlencoding::encode(name).into_owned(),
            urlencoding::encode(&text).into_owned(),
        ));
    }
    sanitized.push((TENANT_HEADER.to_string(), tenant.to_string()));
    Ok(sanitized)
}
