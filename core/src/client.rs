//! Client that builds, dispatches and interprets cluster API requests.
//!
//! # Design
//! `Client` holds a transport and a parameter policy and carries no mutable
//! state between calls. Each action is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes the
//! outcome, so hosts that do their own I/O can skip the transport entirely.
//! The action methods (`exists`, `cat().count`) chain the two halves through
//! `Transport::perform_request`.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::actions::{cat, exists};
use crate::config::ParamPolicy;
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Arguments;
use crate::transport::Transport;
use crate::utils::rescue_from_not_found;

#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    policy: ParamPolicy,
}

#[cfg(feature = "ureq")]
impl Client<crate::transport::UreqTransport> {
    /// Build a ureq-backed client from loaded configuration.
    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        let transport = crate::transport::UreqTransport::with_timeout(&config.url, config.timeout());
        Client::new(transport).with_param_policy(config.param_policy())
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: ParamPolicy::default(),
        }
    }

    pub fn with_param_policy(mut self, policy: ParamPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn param_policy(&self) -> ParamPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a built request and map the status to a result.
    pub fn perform_request(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, path = %request.path, "performing request");
        trace!(query = %request.query_string(), "request parameters");
        let response = self.transport.perform_request(request)?;
        check_status(response)
    }

    /// Does the document exist? A 404 is `false`, not an error.
    pub fn exists(&self, args: impl Into<Arguments>) -> Result<bool> {
        let request = self.build_exists(args)?;
        self.parse_exists(self.perform_request(&request))
    }

    pub fn build_exists(&self, args: impl Into<Arguments>) -> Result<HttpRequest> {
        exists::exists_request(args.into(), self.policy)
    }

    /// True iff the status is exactly 200.
    pub fn parse_exists(&self, outcome: Result<HttpResponse>) -> Result<bool> {
        if let Err(err) = &outcome {
            if err.is_not_found() {
                debug!("document not found");
            }
        }
        rescue_from_not_found(outcome.map(|response| response.status == 200), false)
    }

    /// Namespace for the `_cat` APIs.
    pub fn cat(&self) -> Cat<'_, T> {
        Cat { client: self }
    }

    pub fn build_cat_count(&self, args: impl Into<Arguments>) -> Result<HttpRequest> {
        cat::count_request(args.into(), self.policy)
    }

    /// The raw response body.
    pub fn parse_cat_count(&self, response: HttpResponse) -> Result<String> {
        Ok(response.body)
    }
}

/// The `_cat` namespace, borrowed from a `Client`.
#[derive(Debug)]
pub struct Cat<'a, T> {
    client: &'a Client<T>,
}

impl<T: Transport> Cat<'_, T> {
    /// Document counts for the cluster or the given indices, as the server
    /// formatted them (text unless `format` says otherwise).
    pub fn count(&self, args: impl Into<Arguments>) -> Result<String> {
        let request = self.client.build_cat_count(args)?;
        let response = self.client.perform_request(&request)?;
        self.client.parse_cat_count(response)
    }

    /// Like `count`, with `format=json` forced and the rows deserialized.
    pub fn count_json<R: DeserializeOwned>(&self, args: impl Into<Arguments>) -> Result<R> {
        let args: Arguments = args.into();
        let args = args.arg("format", "json");
        let request = self.client.build_cat_count(args)?;
        self.client.perform_request(&request)?.json()
    }
}

/// Map non-success status codes to the appropriate `Error` variant.
pub fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 404 {
        return Err(Error::NotFound {
            body: response.body,
        });
    }
    Err(Error::Http {
        status: response.status,
        body: response.body,
    })
}
