//! Request builders for the cluster REST API.
//!
//! # Overview
//! Every action is a stateless mapping from an argument bag to exactly one
//! HTTP request: required path arguments are checked, path segments are
//! escaped and joined, query parameters are filtered against the action's
//! allow-list, and the request is handed to a `Transport`. The response is
//! passed back as-is apart from status interpretation.
//!
//! # Design
//! - `Client` is stateless; it holds only a transport and a `ParamPolicy`.
//! - Each action is split into `build_*` (produces `HttpRequest`) and
//!   `parse_*` (consumes the outcome), so the I/O boundary is explicit.
//! - Path and parameter helpers live once in `utils` and are shared by every
//!   action.
//! - Typed parameter records convert into `Arguments`, so callers can choose
//!   between compile-time field names and a loosely typed bag.

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;
pub mod utils;

pub use client::{Cat, Client};
pub use config::{load_config, ClientConfig, ParamPolicy};
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{Arguments, CatCountParams, ExistsParams, ParamValue};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
