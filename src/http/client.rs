//! Creation of the traced HTTP client used by [`HttpTransport`](super::HttpTransport).
//!
//! Every request goes through `reqwest-tracing`, so spans show up wherever the
//! host installed a subscriber. A failed request is never replayed.
//!
//! ```rust
//! use haul::http::{create_http_client, HttpClientConfig};
//! use std::time::Duration;
//!
//! let config = HttpClientConfig::default()
//!     .with_user_agent("MyApp/1.0")
//!     .with_connect_timeout(Duration::from_secs(10));
//! let client = create_http_client(config)?;
//! # Ok::<(), reqwest::Error>(())
//! ```

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Sent when no user agent was configured.
pub const DEFAULT_USER_AGENT: &str = concat!("haul/", env!("CARGO_PKG_VERSION"));

/// Settings of the HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    pub proxy: Option<Proxy>,
    /// Headers sent with every request.
    pub headers: Option<HeaderMap>,
    /// Overrides [`DEFAULT_USER_AGENT`].
    pub user_agent: Option<String>,
    /// Limit for establishing the connection. The transfer itself is unbounded.
    pub connect_timeout: Option<Duration>,
}

impl HttpClientConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// Builds a `reqwest` client from `config` and wraps it with tracing middleware.
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent());

    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(proxy) = config.proxy {
        builder = builder.proxy(proxy);
    }
    // Explicit headers win over the user agent above.
    if let Some(headers) = config.headers {
        builder = builder.default_headers(headers);
    }

    Ok(ClientBuilder::new(builder.build()?)
        .with(TracingMiddleware::default())
        .build())
}
