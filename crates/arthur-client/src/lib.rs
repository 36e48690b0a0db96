//! Client for tenant-scoped Arthur analytics queries.
//!
//! The client holds a validated [`Context`] (tenant identity, base URI,
//! default headers, default query parameters, and an optional injected
//! transport), merges it with a per-call query payload, and issues an
//! authenticated GET request whose parsed JSON body is returned as-is.
//!
//! # Architecture
//!
//! - [`ContextCandidate`] / [`Context`] - unvalidated input and the
//!   validated configuration it becomes. Validation applies a fixed rule
//!   order and the first violated rule wins.
//! - [`ArthurClient`] - stores the context and executes queries. The
//!   context is replaced wholesale by [`ArthurClient::set_context`]; it is
//!   never patched in place.
//! - [`transport::Transport`] - the injectable HTTP seam. When a context
//!   does not provide one, a lazily-constructed reqwest transport is used
//!   (behind the on-by-default `default-transport` feature).
//!
//! # Example
//!
//! ```no_run
//! use arthur_client::{ArthurClient, ContextCandidate};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArthurClient::new(ContextCandidate {
//!     tenant: Some("a6edc906-2f9f-5fb2-a373-efac406f0ef2".into()),
//!     headers: Some(json!({ "x-api-key": "secret" })),
//!     uri: Some("https://api.example.com/query".into()),
//!     ..ContextCandidate::default()
//! })?;
//!
//! let body = client.query(&json!({ "startDate": 1, "endDate": 2 })).await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

mod client;
mod context;
mod request;
pub mod transport;

pub use client::{ArthurClient, ClientError};
pub use context::{Context, ContextCandidate, ContextError};
pub use request::TENANT_HEADER;
#[cfg(feature = "default-transport")]
pub use transport::ReqwestTransport;
pub use transport::{BoxError, Transport, TransportResponse};
