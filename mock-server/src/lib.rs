use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// What `/echo` reflects back about the request it received.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// What `/upload` reports about the multipart payload it received.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadReply {
    pub field: String,
    pub file_name: Option<String>,
    pub size: usize,
    pub form: HashMap<String, String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status_reply))
        .route("/upload", post(upload))
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body,
    })
}

async fn status_reply(Path(code): Path<u16>) -> Result<impl IntoResponse, StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(serde_json::json!({ "code": code }))))
}

/// Accepts one file field plus arbitrary form fields. The reply is JSON
/// served as `text/plain`, so clients that coerce textual bodies get a
/// realistic payload to parse.
async fn upload(mut multipart: Multipart) -> Result<impl IntoResponse, StatusCode> {
    let mut reply = UploadReply {
        field: String::new(),
        file_name: None,
        size: 0,
        form: HashMap::new(),
    };
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            reply.field = name;
            reply.file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            reply.size = bytes.len();
        } else {
            let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            reply.form.insert(name, value);
        }
    }
    if reply.field.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let body = serde_json::to_string(&reply).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(([(header::CONTENT_TYPE, "text/plain")], body))
}
