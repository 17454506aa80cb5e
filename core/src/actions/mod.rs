//! One module per REST action.
//!
//! Each action exposes a pure `*_request` builder that lowers an argument
//! bag into an `HttpRequest`. Dispatch and response interpretation live on
//! `Client`.

pub mod cat;
pub mod exists;

/// Wildcard document type.
pub const UNDERSCORE_ALL: &str = "_all";
