use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::catalog::RowTable;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.catalog.products.all())
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    lookup(&state.catalog.products, &id, "Product not found")
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    lookup(&state.catalog.users, &id, "User not found")
}

fn lookup(table: &RowTable, id: &str, not_found: &str) -> Response {
    let row = table.get(id);
    metrics::record_lookup(table.name(), row.is_some());
    match row {
        Some(row) => (StatusCode::OK, Json(row.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": not_found }))).into_response(),
    }
}

/// `POST /api/products`: echo the body back for manual testing.
pub async fn echo_product(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let echoed = if content_type.contains("application/json") {
        match serde_json::from_slice::<Value>(&body) {
            Ok(v) => v,
            Err(_) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Bad request" }))).into_response(),
        }
    } else {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    };

    tracing::info!(content_type = %content_type, body = %echoed, "POST /api/products");
    (StatusCode::OK, Json(json!({ "body": echoed }))).into_response()
}
