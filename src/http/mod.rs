//! HTTP client functionality and the transport capability.
//!
//! - [`client`] - creation of the traced `reqwest` client
//! - [`transport`] - the [`Transport`] trait and its `reqwest` implementation

pub mod client;
pub mod transport;

pub use client::{create_http_client, HttpClientConfig};
pub use transport::{HttpTransport, Outcome, Transport};
