//! Executing a built request.
//!
//! # Design
//! `Transport` is the one seam where I/O happens. A transport returns every
//! HTTP response as data, 4xx and 5xx included, and errors only when no
//! response arrived at all. Status interpretation stays in `ApiClient`.
//!
//! Any `Fn(HttpRequest) -> Result<HttpResponse, TransportError>` is a
//! transport, which is how tests script a server. `UreqTransport` is the
//! blocking implementation used against a real endpoint.

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// No HTTP response was obtained (connect failure, timeout, broken body).
#[derive(Debug, Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::time::Duration;

    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport over a shared `ureq::Agent`.
    ///
    /// ureq's status-code-as-error behavior is disabled so rejections come
    /// back as responses.
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::with_timeout(None)
        }

        /// `None` waits indefinitely.
        pub fn with_timeout(timeout: Option<Duration>) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            let result = match req.method {
                HttpMethod::Get => {
                    let mut builder = self.agent.get(&req.path);
                    for (key, value) in &req.headers {
                        builder = builder.header(key.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Delete => {
                    let mut builder = self.agent.delete(&req.path);
                    for (key, value) in &req.headers {
                        builder = builder.header(key.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Post | HttpMethod::Put => {
                    let mut builder = if req.method == HttpMethod::Post {
                        self.agent.post(&req.path)
                    } else {
                        self.agent.put(&req.path)
                    };
                    for (key, value) in &req.headers {
                        builder = builder.header(key.as_str(), value.as_str());
                    }
                    match req.body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| TransportError(e.to_string()))?;

            Ok(HttpResponse { status, headers, body })
        }
    }
}
