//! `HEAD /{index}/{type}/{id}`: does a document exist?

use crate::actions::UNDERSCORE_ALL;
use crate::config::ParamPolicy;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{Arguments, ParamValue};
use crate::utils::{escape, extract_query_params, pathify, require};

pub const VALID_EXISTS_PARAMS: &[&str] = &["parent", "preference", "realtime", "refresh", "routing"];

/// Build the existence check for one document.
///
/// `index` and `id` are required; `type` defaults to `_all`.
pub fn exists_request(mut args: Arguments, policy: ParamPolicy) -> Result<HttpRequest> {
    let id = require(&mut args, "id")?;
    let index = require(&mut args, "index")?;
    let doc_type = match args.remove("type") {
        Some(value) if !value.is_blank() => value,
        _ => ParamValue::from(UNDERSCORE_ALL),
    };

    let index = escape(&index.to_string());
    let doc_type = escape(&doc_type.to_string());
    let id = escape(&id.to_string());
    let path = pathify([Some(index.as_str()), Some(doc_type.as_str()), Some(id.as_str())]);

    let params = extract_query_params("exists", &args, VALID_EXISTS_PARAMS, policy)?;

    Ok(HttpRequest {
        method: HttpMethod::Head,
        path,
        params: params.to_query(),
        headers: Vec::new(),
        body: None,
    })
}
