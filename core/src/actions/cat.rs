//! Compact, human-oriented `_cat` APIs.

use crate::config::ParamPolicy;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::Arguments;
use crate::utils::{escaped_list, extract_query_params, listify, pathify};

pub const VALID_COUNT_PARAMS: &[&str] = &["local", "master_timeout", "h", "help", "v"];

/// Build `GET /_cat/count[/{index}]`.
///
/// `index` is a path component and never reaches the query string. `h` is
/// sent as a comma-separated column list.
pub fn count_request(mut args: Arguments, policy: ParamPolicy) -> Result<HttpRequest> {
    let index = args.remove("index");
    let index = escaped_list(index.as_ref());
    let path = pathify([Some("_cat/count"), index.as_deref()]);

    let mut params = extract_query_params("cat.count", &args, VALID_COUNT_PARAMS, policy)?;
    if let Some(columns) = listify(params.get("h")) {
        params.insert("h", columns);
    }

    Ok(HttpRequest {
        method: HttpMethod::Get,
        path,
        params: params.to_query(),
        headers: Vec::new(),
        body: None,
    })
}
