//! Path and parameter helpers shared by every action.

use tracing::warn;
use url::form_urlencoded;

use crate::config::ParamPolicy;
use crate::error::{Error, Result};
use crate::params::{Arguments, ParamValue};

/// Query parameters every action accepts on top of its own allow-list.
pub const COMMON_QUERY_PARAMS: &[&str] = &["format", "pretty", "human"];

/// Percent-encode a single path segment.
///
/// Everything outside `[A-Za-z0-9*-._]` is encoded, so a `/` or `,` inside a
/// value cannot be mistaken for a separator. Spaces become `%20`.
pub fn escape(value: &str) -> String {
    // byte_serialize emits `+` only for a space; a literal `+` is already `%2B`.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Join a list value with `,`; a string passes through unchanged.
pub fn listify(value: Option<&ParamValue>) -> Option<String> {
    value.map(ParamValue::to_string)
}

/// Escape each name individually, then join them with `,`.
///
/// Comma-separated strings are split first, so `"a,b"` becomes `a,b`
/// rather than `a%2Cb`.
pub fn escaped_list(value: Option<&ParamValue>) -> Option<String> {
    let names: Vec<String> = value?.to_names().iter().map(|name| escape(name)).collect();
    let joined = ParamValue::List(names);
    listify(Some(&joined)).filter(|s| !s.is_empty())
}

/// Join escaped path segments with `/`.
///
/// Absent and blank segments are dropped, repeated slashes collapse to one,
/// and the result never starts or ends with `/`.
pub fn pathify<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    segments
        .into_iter()
        .flatten()
        .flat_map(|segment| segment.split('/'))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Keep only the arguments whose names appear in `allow_list`.
pub fn validate_and_extract(args: &Arguments, allow_list: &[&str]) -> Arguments {
    args.iter()
        .filter(|(name, _)| allow_list.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Names in `args` that are neither in `allow_list` nor common query params.
pub fn unknown_params<'a>(args: &'a Arguments, allow_list: &[&str]) -> Vec<&'a str> {
    args.keys()
        .filter(|name| !allow_list.contains(name) && !COMMON_QUERY_PARAMS.contains(name))
        .collect()
}

/// Apply `policy` to unknown parameters, then extract the query arguments.
///
/// Common query params are always kept. Under `ParamPolicy::Strict` the
/// first unknown name fails the call; otherwise each one is logged and
/// dropped.
pub fn extract_query_params(
    action: &str,
    args: &Arguments,
    allow_list: &[&str],
    policy: ParamPolicy,
) -> Result<Arguments> {
    for name in unknown_params(args, allow_list) {
        match policy {
            ParamPolicy::Strict => return Err(Error::UnsupportedParameter(name.to_string())),
            ParamPolicy::Permissive => warn!(action, param = name, "dropping unsupported parameter"),
        }
    }
    let allowed: Vec<&str> = allow_list.iter().chain(COMMON_QUERY_PARAMS).copied().collect();
    Ok(validate_and_extract(args, &allowed))
}

/// Take a required path argument out of `args`.
///
/// Absent and blank values count as missing.
pub fn require(args: &mut Arguments, name: &'static str) -> Result<ParamValue> {
    match args.remove(name) {
        Some(value) if !value.is_blank() => Ok(value),
        _ => Err(Error::MissingArgument(name)),
    }
}

/// Map a not-found outcome to `fallback`, propagating every other error.
pub fn rescue_from_not_found<T>(result: Result<T>, fallback: T) -> Result<T> {
    match result {
        Err(err) if err.is_not_found() => Ok(fallback),
        other => other,
    }
}
