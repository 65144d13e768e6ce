//! Tests of the hyper bridge over a real socket.

mod common;

use std::sync::Arc;

use tabula_api::{build_dispatcher, server, ApiConfig, ApiContext};
use tabula_router::{Dispatcher, Method, Reply, Request, RouteTable};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn start(dispatcher: Dispatcher) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, dispatcher));
    addr
}

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8_lossy(&out).into_owned()
}

async fn api_server() -> std::net::SocketAddr {
    let db = common::setup_db().await;
    let ctx = Arc::new(ApiContext::new(ApiConfig::default(), Arc::new(db)));
    start(build_dispatcher(ctx).unwrap()).await
}

#[tokio::test]
async fn serves_table_list() {
    let addr = api_server().await;
    let response = roundtrip(
        addr,
        "GET /apid/db/_table HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with(r#"{"Names":["gadgets","widgets"]}"#), "{response}");
}

#[tokio::test]
async fn serves_query_string_and_body() {
    let addr = api_server().await;
    let payload = r#"{"Records":[{"Keys":["label"],"Values":["x"]}]}"#;
    let request = format!(
        "POST /apid/db/_table/gadgets HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
        payload.len()
    );
    let response = roundtrip(addr, &request).await;
    assert!(response.starts_with("HTTP/1.1 201 Created"), "{response}");
    assert!(response.ends_with(r#"{"Ids":[1]}"#), "{response}");

    let response = roundtrip(
        addr,
        "GET /apid/db/_table/gadgets?id_field=gid&ids=1&fields=label HTTP/1.1\r\n\
         Host: test\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(
        response.ends_with(r#"{"Records":[{"Keys":["label"],"Values":["x"]}]}"#),
        "{response}"
    );
}

#[tokio::test]
async fn percent_encoded_path_is_decoded() {
    let addr = api_server().await;
    let response = roundtrip(
        addr,
        "GET /apid/db/_table/wid%67ets/3?fields=name HTTP/1.1\r\nHost: test\r\n\
         Connection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(
        response.ends_with(r#"{"Records":[{"Keys":["name"],"Values":["widget3"]}]}"#),
        "{response}"
    );
}

#[tokio::test]
async fn repeated_headers_are_joined() {
    let mut table = RouteTable::new();
    table
        .register("/echo", Method::Get, |req: Request| async move {
            Reply::text(200, req.get_header("x-tag").unwrap_or_default().to_string())
        })
        .unwrap();
    let addr = start(Dispatcher::new(Arc::new(table))).await;

    let response = roundtrip(
        addr,
        "GET /echo HTTP/1.1\r\nHost: test\r\nX-Tag: a\r\nX-Tag: b\r\n\
         Connection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("a, b"), "{response}");
}

#[tokio::test]
async fn put_on_get_post_path_is_method_not_allowed() {
    let mut table = RouteTable::new();
    table
        .register("/abc", Method::Get, |_req: Request| async { Reply::text(200, "get") })
        .unwrap()
        .register("/abc", Method::Post, |_req: Request| async {
            Reply::text(200, "post")
        })
        .unwrap();
    let addr = start(Dispatcher::new(Arc::new(table))).await;

    let response = roundtrip(
        addr,
        "PUT /abc HTTP/1.1\r\nHost: test\r\nConnection: close\r\nContent-Length: 0\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 405"), "{response}");
    assert!(response.to_ascii_lowercase().contains("allow: get,post"), "{response}");

    let response = roundtrip(
        addr,
        "BREW /abc HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 405"), "{response}");

    let response = roundtrip(
        addr,
        "GET /nowhere HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404"), "{response}");
}
