use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// A stored document and its version counter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub version: u64,
    pub source: Value,
}

/// In-memory cluster state: index name -> (type, id) -> document.
#[derive(Clone, Debug, Default)]
pub struct Cluster {
    indices: BTreeMap<String, HashMap<(String, String), Document>>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, creating the index on first use.
    ///
    /// Returns the stored version; version 1 means the document was created.
    pub fn index_document(&mut self, index: &str, doc_type: &str, id: &str, source: Value) -> u64 {
        let docs = self.indices.entry(index.to_string()).or_default();
        let key = (doc_type.to_string(), id.to_string());
        let version = docs.get(&key).map_or(1, |doc| doc.version + 1);
        docs.insert(key, Document { version, source });
        version
    }

    pub fn create_index(&mut self, index: &str) {
        self.indices.entry(index.to_string()).or_default();
    }

    /// Find a document; `_all` matches any type.
    pub fn get(&self, index: &str, doc_type: &str, id: &str) -> Option<(&str, &Document)> {
        let docs = self.indices.get(index)?;
        docs.iter()
            .find(|((t, i), _)| i == id && (doc_type == "_all" || t == doc_type))
            .map(|((t, _), doc)| (t.as_str(), doc))
    }

    /// Resolve a comma-separated index expression to concrete index names.
    ///
    /// `_all` and `*` match everything, a trailing `*` matches by prefix.
    /// Returns the first concrete name that does not exist as the error.
    pub fn resolve(&self, expression: &str) -> Result<Vec<&str>, String> {
        let mut names = Vec::new();
        for part in expression.split(',').filter(|p| !p.is_empty()) {
            if part == "_all" || part == "*" {
                names.extend(self.indices.keys().map(String::as_str));
            } else if let Some(prefix) = part.strip_suffix('*') {
                names.extend(
                    self.indices
                        .keys()
                        .filter(|name| name.starts_with(prefix))
                        .map(String::as_str),
                );
            } else if let Some((name, _)) = self.indices.get_key_value(part) {
                names.push(name.as_str());
            } else {
                return Err(part.to_string());
            }
        }
        names.sort_unstable();
        names.dedup();
        Ok(names)
    }

    /// Total document count over `indices`, or the whole cluster when `None`.
    pub fn count(&self, indices: Option<&[&str]>) -> usize {
        match indices {
            Some(names) => names
                .iter()
                .filter_map(|name| self.indices.get(*name))
                .map(HashMap::len)
                .sum(),
            None => self.indices.values().map(HashMap::len).sum(),
        }
    }
}

pub type Db = Arc<RwLock<Cluster>>;

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/_cat/count", get(cat_count_all))
        .route("/_cat/count/{index}", get(cat_count_index))
        .route("/{index}/{doc_type}", post(create_document))
        .route(
            "/{index}/{doc_type}/{id}",
            get(get_document).put(put_document),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

// ---------------------------------------------------------------------------
// _cat/count
// ---------------------------------------------------------------------------

const COUNT_COLUMNS: &[(&str, &str, &str)] = &[
    ("epoch", "t,time", "seconds since 1970-01-01 00:00:00"),
    ("timestamp", "ts,hms,hhmmss", "time in HH:MM:SS"),
    ("count", "dc,docs.count,docsCount", "the document count"),
];

async fn cat_count_all(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let cluster = db.read().await;
    render_count(cluster.count(None), &params)
}

async fn cat_count_index(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let cluster = db.read().await;
    match cluster.resolve(&index) {
        Ok(names) => render_count(cluster.count(Some(names.as_slice())), &params),
        Err(missing) => index_not_found(&missing),
    }
}

/// `?v` and `?v=true` both enable a flag.
fn flag(params: &HashMap<String, String>, name: &str) -> bool {
    params
        .get(name)
        .is_some_and(|value| value.is_empty() || value == "true")
}

fn render_count(count: usize, params: &HashMap<String, String>) -> Response {
    if flag(params, "help") {
        return text(help_table());
    }

    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let secs_of_day = epoch % 86_400;
    let timestamp = format!(
        "{:02}:{:02}:{:02}",
        secs_of_day / 3600,
        (secs_of_day % 3600) / 60,
        secs_of_day % 60
    );
    let row = [epoch.to_string(), timestamp, count.to_string()];

    let selected: Vec<usize> = match params.get("h") {
        Some(h) => h
            .split(',')
            .filter_map(|col| column_index(col.trim()))
            .collect(),
        None => (0..COUNT_COLUMNS.len()).collect(),
    };
    debug!(count, columns = ?selected, "rendering _cat/count");

    if params.get("format").map(String::as_str) == Some("json") {
        let object: serde_json::Map<String, Value> = selected
            .iter()
            .map(|&i| (COUNT_COLUMNS[i].0.to_string(), Value::String(row[i].clone())))
            .collect();
        return Json(json!([object])).into_response();
    }

    let mut lines: Vec<Vec<String>> = Vec::new();
    if flag(params, "v") {
        lines.push(selected.iter().map(|&i| COUNT_COLUMNS[i].0.to_string()).collect());
    }
    lines.push(selected.iter().map(|&i| row[i].clone()).collect());
    text(align(&lines))
}

fn column_index(name: &str) -> Option<usize> {
    COUNT_COLUMNS
        .iter()
        .position(|(full, aliases, _)| *full == name || aliases.split(',').any(|a| a == name))
}

fn help_table() -> String {
    let lines: Vec<Vec<String>> = COUNT_COLUMNS
        .iter()
        .map(|(name, aliases, desc)| vec![name.to_string(), format!("| {aliases}"), format!("| {desc}")])
        .collect();
    align(&lines)
}

/// Left-align columns, padding each to its widest cell.
fn align(lines: &[Vec<String>]) -> String {
    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| lines.iter().filter_map(|l| l.get(c)).map(String::len).max().unwrap_or(0))
        .collect();
    let mut out = String::new();
    for line in lines {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(c, cell)| format!("{cell:<width$}", width = widths[c]))
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}

fn text(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/plain; charset=UTF-8")], body).into_response()
}

fn index_not_found(index: &str) -> Response {
    let cause = json!({
        "type": "index_not_found_exception",
        "reason": format!("no such index [{index}]"),
        "index": index,
    });
    let body = json!({
        "error": {
            "root_cause": [cause.clone()],
            "type": cause["type"],
            "reason": cause["reason"],
            "index": index,
        },
        "status": 404,
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

async fn get_document(
    State(db): State<Db>,
    Path((index, doc_type, id)): Path<(String, String, String)>,
) -> (StatusCode, Json<Value>) {
    let cluster = db.read().await;
    match cluster.get(&index, &doc_type, &id) {
        Some((found_type, doc)) => (
            StatusCode::OK,
            Json(json!({
                "_index": index,
                "_type": found_type,
                "_id": id,
                "_version": doc.version,
                "found": true,
                "_source": doc.source,
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "_index": index,
                "_type": doc_type,
                "_id": id,
                "found": false,
            })),
        ),
    }
}

async fn put_document(
    State(db): State<Db>,
    Path((index, doc_type, id)): Path<(String, String, String)>,
    Json(source): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let version = db.write().await.index_document(&index, &doc_type, &id, source);
    write_result(index, doc_type, id, version)
}

async fn create_document(
    State(db): State<Db>,
    Path((index, doc_type)): Path<(String, String)>,
    Json(source): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4().simple().to_string();
    let version = db.write().await.index_document(&index, &doc_type, &id, source);
    write_result(index, doc_type, id, version)
}

fn write_result(index: String, doc_type: String, id: String, version: u64) -> (StatusCode, Json<Value>) {
    let (status, result) = if version == 1 {
        (StatusCode::CREATED, "created")
    } else {
        (StatusCode::OK, "updated")
    };
    (
        status,
        Json(json!({
            "_index": index,
            "_type": doc_type,
            "_id": id,
            "_version": version,
            "result": result,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> Cluster {
        let mut cluster = Cluster::new();
        cluster.index_document("logs-a", "event", "1", json!({"msg": "one"}));
        cluster.index_document("logs-a", "event", "2", json!({"msg": "two"}));
        cluster.index_document("logs-b", "event", "1", json!({"msg": "three"}));
        cluster.index_document("users", "user", "kim", json!({"name": "Kim"}));
        cluster
    }

    #[test]
    fn index_document_tracks_versions() {
        let mut cluster = Cluster::new();
        assert_eq!(cluster.index_document("i", "doc", "1", json!({})), 1);
        assert_eq!(cluster.index_document("i", "doc", "1", json!({"a": 1})), 2);
        let (_, doc) = cluster.get("i", "doc", "1").unwrap();
        assert_eq!(doc.source, json!({"a": 1}));
    }

    #[test]
    fn get_with_all_type_matches_any() {
        let cluster = cluster();
        assert_eq!(cluster.get("users", "_all", "kim").unwrap().0, "user");
        assert!(cluster.get("users", "event", "kim").is_none());
        assert!(cluster.get("missing", "_all", "kim").is_none());
    }

    #[test]
    fn resolve_expressions() {
        let cluster = cluster();
        assert_eq!(cluster.resolve("logs-*").unwrap(), vec!["logs-a", "logs-b"]);
        assert_eq!(cluster.resolve("users,logs-a").unwrap(), vec!["logs-a", "users"]);
        assert_eq!(cluster.resolve("_all").unwrap().len(), 3);
        assert_eq!(cluster.resolve("users,nope").unwrap_err(), "nope");
    }

    #[test]
    fn count_over_indices() {
        let cluster = cluster();
        assert_eq!(cluster.count(None), 4);
        assert_eq!(cluster.count(Some(&["logs-a", "logs-b"][..])), 3);
        assert_eq!(cluster.count(Some(&[][..])), 0);
    }

    #[test]
    fn column_aliases() {
        assert_eq!(column_index("count"), Some(2));
        assert_eq!(column_index("dc"), Some(2));
        assert_eq!(column_index("ts"), Some(1));
        assert_eq!(column_index("bogus"), None);
    }

    #[test]
    fn align_pads_columns() {
        let lines = vec![
            vec!["epoch".to_string(), "count".to_string()],
            vec!["1".to_string(), "42".to_string()],
        ];
        assert_eq!(align(&lines), "epoch count\n1     42\n");
    }
}
