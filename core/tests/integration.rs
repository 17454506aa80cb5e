//! End-to-end tests against the live mock cluster.
//!
//! # Design
//! Starts the mock server on a random port with seeded documents, then drives
//! every client action over real HTTP through `UreqTransport`. Validates that
//! request building, escaping and status interpretation agree with a server.

use std::sync::Arc;

use esapi_core::{
    Arguments, CatCountParams, Client, ClientConfig, Error, ExistsParams, ParamPolicy,
    UreqTransport,
};
use mock_server::{Cluster, Db};
use serde_json::json;
use tokio::sync::RwLock;

/// Start the mock server on a random port and return its base URL.
fn start_server(db: Db) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, db).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn seeded() -> Db {
    let mut cluster = Cluster::new();
    cluster.index_document("index-a", "doc", "1", json!({"title": "one"}));
    cluster.index_document("index-a", "doc", "2", json!({"title": "two"}));
    cluster.index_document("index-b", "doc", "1", json!({"title": "three"}));
    cluster.index_document("index-b", "doc", "a b/c", json!({"title": "escaped"}));
    cluster.create_index("empty");
    Arc::new(RwLock::new(cluster))
}

fn client(base_url: &str) -> Client<UreqTransport> {
    Client::new(UreqTransport::new(base_url))
}

#[test]
fn exists_lifecycle() {
    let base_url = start_server(seeded());
    let client = client(&base_url);

    // Step 1: present document, default `_all` type.
    assert!(client.exists(ExistsParams::new("index-a", "1")).unwrap());

    // Step 2: explicit matching type.
    assert!(client
        .exists(ExistsParams::new("index-a", "2").doc_type("doc"))
        .unwrap());

    // Step 3: wrong type is a 404, mapped to false.
    assert!(!client
        .exists(ExistsParams::new("index-a", "2").doc_type("other"))
        .unwrap());

    // Step 4: missing document and missing index are both false.
    assert!(!client.exists(ExistsParams::new("index-a", "99")).unwrap());
    assert!(!client.exists(ExistsParams::new("nope", "1")).unwrap());

    // Step 5: an id containing a space and a slash survives escaping.
    assert!(client.exists(ExistsParams::new("index-b", "a b/c")).unwrap());

    // Step 6: query params are accepted by the server.
    let args = Arguments::new()
        .arg("index", "index-b")
        .arg("id", "1")
        .arg("routing", "r1")
        .arg("realtime", true);
    assert!(client.exists(args).unwrap());

    // Step 7: missing id never reaches the server.
    let err = client.exists(Arguments::new().arg("index", "index-a")).unwrap_err();
    assert!(matches!(err, Error::MissingArgument("id")));
}

#[test]
fn cat_count_lifecycle() {
    let base_url = start_server(seeded());
    let client = client(&base_url);

    // Whole cluster.
    let body = client.cat().count(Arguments::new().arg("h", "count")).unwrap();
    assert_eq!(body, "4\n");

    // Index list.
    let body = client
        .cat()
        .count(
            Arguments::new()
                .arg("index", ["index-a", "empty"])
                .arg("h", ["count"])
                .arg("v", true),
        )
        .unwrap();
    assert_eq!(body, "count\n2\n");

    // Typed params, comma-separated index string.
    let body = client
        .cat()
        .count(CatCountParams {
            index: vec!["index-a,index-b".to_string()],
            h: vec!["dc".to_string()],
            ..Default::default()
        })
        .unwrap();
    assert_eq!(body, "4\n");

    // JSON rows.
    let rows: Vec<serde_json::Value> = client
        .cat()
        .count_json(Arguments::new().arg("index", "index-b"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["count"], "2");

    // Unknown index surfaces as NotFound.
    let err = client
        .cat()
        .count(Arguments::new().arg("index", "missing"))
        .unwrap_err();
    match err {
        Error::NotFound { body } => assert!(body.contains("index_not_found_exception")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn client_from_config() {
    let base_url = start_server(seeded());
    let config = ClientConfig {
        url: base_url,
        strict_params: true,
        timeout_secs: Some(5),
    };
    let client = Client::from_config(&config);
    assert_eq!(client.param_policy(), ParamPolicy::Strict);

    assert!(client.exists(ExistsParams::new("index-a", "1")).unwrap());
    let err = client
        .cat()
        .count(Arguments::new().arg("verbose", true))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedParameter(ref name) if name == "verbose"));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{addr}"));
    let err = client.exists(ExistsParams::new("index-a", "1")).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
