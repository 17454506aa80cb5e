//! Argument bags and parameter values.
//!
//! # Design
//! `Arguments` is the loosely typed surface every action accepts: a map from
//! parameter name to `ParamValue`. It is sorted by key so the rendered query
//! string is deterministic. Typed per-action records (`CatCountParams`,
//! `ExistsParams`) convert into it, giving callers compile-time field names
//! while the actions keep one lowering path.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Str(String),
    List(Vec<String>),
    #[serde(skip)]
    Time(Duration),
}

impl ParamValue {
    /// Names carried by this value, splitting comma-separated strings.
    ///
    /// Blank entries are dropped. Used for index lists that become path
    /// segments, where `"a,b"` and `["a", "b"]` mean the same thing.
    pub fn to_names(&self) -> Vec<String> {
        let split = |s: &str| -> Vec<String> {
            s.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        };
        match self {
            ParamValue::Str(s) => split(s),
            ParamValue::List(items) => items.iter().flat_map(|item| split(item)).collect(),
            other => vec![other.to_string()],
        }
    }

    /// True for an empty string or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Str(s) => s.trim().is_empty(),
            ParamValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            ParamValue::Bool(_) | ParamValue::Time(_) => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
            ParamValue::Time(d) => f.write_str(&format_time(*d)),
        }
    }
}

/// Render a duration in the largest exact time unit the cluster accepts.
fn format_time(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos % 1_000_000_000 == 0 {
        format!("{}s", d.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", d.as_millis())
    } else if nanos % 1_000 == 0 {
        format!("{}micros", d.as_micros())
    } else {
        format!("{nanos}nanos")
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Str(s.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<Duration> for ParamValue {
    fn from(d: Duration) -> Self {
        ParamValue::Time(d)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(items: Vec<&str>) -> Self {
        ParamValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(items: [&str; N]) -> Self {
        ParamValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// A loosely typed argument bag for one action call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Arguments {
    values: BTreeMap<String, ParamValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render every value as a query parameter pair.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Arguments {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

/// Parameters for `_cat/count`.
#[derive(Debug, Clone, Default)]
pub struct CatCountParams {
    /// Indices to count; empty means the whole cluster.
    pub index: Vec<String>,
    /// Columns to display.
    pub h: Vec<String>,
    /// Display column headers.
    pub v: Option<bool>,
    /// Return help about the available columns instead of counts.
    pub help: Option<bool>,
    /// Read local node state instead of asking the master (server default: false).
    pub local: Option<bool>,
    pub master_timeout: Option<Duration>,
    /// `text` or `json` (server default: text).
    pub format: Option<String>,
}

impl From<CatCountParams> for Arguments {
    fn from(p: CatCountParams) -> Self {
        let mut args = Arguments::new();
        if !p.index.is_empty() {
            args.insert("index", p.index);
        }
        if !p.h.is_empty() {
            args.insert("h", p.h);
        }
        insert_opt(&mut args, "v", p.v);
        insert_opt(&mut args, "help", p.help);
        insert_opt(&mut args, "local", p.local);
        insert_opt(&mut args, "master_timeout", p.master_timeout);
        insert_opt(&mut args, "format", p.format);
        args
    }
}

/// Parameters for a document existence check.
#[derive(Debug, Clone)]
pub struct ExistsParams {
    pub index: String,
    pub id: String,
    /// Document type; `_all` when unset.
    pub doc_type: Option<String>,
    pub parent: Option<String>,
    /// Node or shard preference (server default: random).
    pub preference: Option<String>,
    pub realtime: Option<bool>,
    pub refresh: Option<bool>,
    pub routing: Option<String>,
}

impl ExistsParams {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            doc_type: None,
            parent: None,
            preference: None,
            realtime: None,
            refresh: None,
            routing: None,
        }
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }
}

impl From<ExistsParams> for Arguments {
    fn from(p: ExistsParams) -> Self {
        let mut args = Arguments::new().arg("index", p.index).arg("id", p.id);
        insert_opt(&mut args, "type", p.doc_type);
        insert_opt(&mut args, "parent", p.parent);
        insert_opt(&mut args, "preference", p.preference);
        insert_opt(&mut args, "realtime", p.realtime);
        insert_opt(&mut args, "refresh", p.refresh);
        insert_opt(&mut args, "routing", p.routing);
        args
    }
}

fn insert_opt<V: Into<ParamValue>>(args: &mut Arguments, name: &str, value: Option<V>) {
    if let Some(value) = value {
        args.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_query_values() {
        assert_eq!(ParamValue::from("x").to_string(), "x");
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from(["a", "b", "a"]).to_string(), "a,b,a");
    }

    #[test]
    fn time_uses_largest_exact_unit() {
        assert_eq!(ParamValue::from(Duration::from_secs(30)).to_string(), "30s");
        assert_eq!(ParamValue::from(Duration::from_millis(1500)).to_string(), "1500ms");
        assert_eq!(ParamValue::from(Duration::from_micros(7)).to_string(), "7micros");
        assert_eq!(ParamValue::from(Duration::from_nanos(9)).to_string(), "9nanos");
    }

    #[test]
    fn names_split_comma_separated_strings() {
        assert_eq!(ParamValue::from("a,b").to_names(), vec!["a", "b"]);
        assert_eq!(ParamValue::from(vec!["a", "b,c", ""]).to_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_values() {
        assert!(ParamValue::from("  ").is_blank());
        assert!(ParamValue::List(Vec::new()).is_blank());
        assert!(!ParamValue::from(false).is_blank());
        assert!(!ParamValue::from("i").is_blank());
    }

    #[test]
    fn arguments_are_sorted_by_name() {
        let args = Arguments::new().arg("v", true).arg("h", "count");
        let keys: Vec<&str> = args.keys().collect();
        assert_eq!(keys, vec!["h", "v"]);
        assert_eq!(
            args.to_query(),
            vec![("h".to_string(), "count".to_string()), ("v".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn arguments_deserialize_from_json() {
        let args: Arguments =
            serde_json::from_str(r#"{"index":["a","b"],"v":true,"routing":"r1"}"#).unwrap();
        assert_eq!(args.get("index"), Some(&ParamValue::from(["a", "b"])));
        assert_eq!(args.get("v"), Some(&ParamValue::Bool(true)));
        assert_eq!(args.get("routing"), Some(&ParamValue::from("r1")));
    }

    #[test]
    fn cat_count_params_lower_to_arguments() {
        let args: Arguments = CatCountParams {
            index: vec!["logs".to_string()],
            v: Some(true),
            master_timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        }
        .into();
        assert_eq!(args.len(), 3);
        assert_eq!(args.get("master_timeout").unwrap().to_string(), "10s");
        assert!(!args.contains("h"));
    }

    #[test]
    fn exists_params_lower_to_arguments() {
        let args: Arguments = ExistsParams::new("i", "1").doc_type("doc").routing("r").into();
        assert_eq!(args.get("index"), Some(&ParamValue::from("i")));
        assert_eq!(args.get("id"), Some(&ParamValue::from("1")));
        assert_eq!(args.get("type"), Some(&ParamValue::from("doc")));
        assert_eq!(args.get("routing"), Some(&ParamValue::from("r")));
        assert!(!args.contains("parent"));
    }
}
