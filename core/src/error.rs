//! Error types for the cluster API client.
//!
//! # Design
//! `MissingArgument` is raised while building a request, before the transport
//! is ever called. `NotFound` gets a dedicated variant because existence
//! checks turn it into `false`; every other non-2xx response lands in `Http`
//! with the raw status code and body. Transport failures are boxed so any
//! transport implementation can report its own error type unchanged.

/// Errors returned by `Client` build, dispatch and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required path argument (such as `index` or `id`) was absent or empty.
    #[error("required argument '{0}' missing")]
    MissingArgument(&'static str),

    /// A parameter outside the action's allow-list, rejected in strict mode.
    #[error("URL parameter '{0}' is not supported")]
    UnsupportedParameter(String),

    /// The server returned 404.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl Error {
    /// True for `NotFound` and for an `Http` error carrying status 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Http { status: 404, .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
