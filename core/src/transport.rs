//! The seam between request building and network I/O.
//!
//! # Design
//! A `Transport` executes one `HttpRequest` and hands back the response as
//! data, whatever its status. Connection handling, timeouts and retries all
//! live behind this trait; the client only interprets status codes.

use std::sync::Arc;

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    /// Execute `request` and return the response for any HTTP status.
    ///
    /// Only failures that prevent a response from arriving are errors.
    fn perform_request(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn perform_request(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).perform_request(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn perform_request(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).perform_request(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn perform_request(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).perform_request(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::time::Duration;

    use tracing::trace;

    use super::Transport;
    use crate::error::{Error, Result};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a ureq agent.
    ///
    /// ureq's status-code-as-error behavior is disabled so 4xx/5xx responses
    /// come back as data.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        base_url: String,
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(base_url: &str) -> Self {
            Self::with_timeout(base_url, None)
        }

        pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                agent,
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }
    }

    impl Transport for UreqTransport {
        fn perform_request(&self, request: &HttpRequest) -> Result<HttpResponse> {
            let url = request.url(&self.base_url);
            trace!(%url, "sending request");

            let body = request.body.as_deref();
            let result = match (request.method, body) {
                (HttpMethod::Get, _) => self.agent.get(&url).call(),
                (HttpMethod::Head, _) => self.agent.head(&url).call(),
                (HttpMethod::Delete, _) => self.agent.delete(&url).call(),
                (HttpMethod::Post, Some(body)) => self
                    .agent
                    .post(&url)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                (HttpMethod::Post, None) => self.agent.post(&url).send_empty(),
                (HttpMethod::Put, Some(body)) => self
                    .agent
                    .put(&url)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                (HttpMethod::Put, None) => self.agent.put(&url).send_empty(),
            };
            let mut response = result.map_err(|e| Error::Transport(Box::new(e)))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = if request.method == HttpMethod::Head {
                String::new()
            } else {
                response
                    .body_mut()
                    .read_to_string()
                    .map_err(|e| Error::Transport(Box::new(e)))?
            };

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
