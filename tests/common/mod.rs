#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

pub type Received = Arc<Mutex<Vec<ReceivedField>>>;

async fn accept(State(received): State<Received>, mut multipart: Multipart) -> StatusCode {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let Ok(data) = field.bytes().await else {
            return StatusCode::BAD_REQUEST;
        };
        received.lock().unwrap().push(ReceivedField {
            name,
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }
    StatusCode::OK
}

async fn reject(_body: Bytes) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn stall() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(60)).await;
    StatusCode::OK
}

/// Local endpoint with `/upload` (stores fields), `/broken` (500) and
/// `/stall` (never answers in time).
pub async fn spawn_server() -> (SocketAddr, Received) {
    let received = Received::default();
    let router = Router::new()
        .route("/upload", post(accept))
        .route("/broken", post(reject))
        .route("/stall", post(stall))
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, received)
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
