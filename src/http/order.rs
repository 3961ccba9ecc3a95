use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::http::request::{request_id, ProxyRequest};
use crate::http::response::ProxyResponse;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::OrderProxy;

/// `POST /api/order`: forward one order payload upstream.
pub async fn proxy_order(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    let response = handle_order(&state.proxy, state.default_destination.as_deref(), &body, &request_id).await;

    tracing::info!(
        request_id = %request_id,
        status = response.status().as_u16(),
        outcome = response.outcome(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Order proxy call finished"
    );
    metrics::record_proxy_request(response.outcome(), start_time);

    response.into_response()
}

/// Decode, resolve the destination, forward, normalize.
///
/// Client errors return before any network activity.
pub async fn handle_order(
    proxy: &OrderProxy,
    default_destination: Option<&str>,
    body: &[u8],
    request_id: &str,
) -> ProxyResponse {
    let (destination, payload) = match ProxyRequest::from_slice(body).and_then(|r| r.resolve(default_destination)) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected order proxy request");
            return ProxyResponse::from(e);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        destination = %destination,
        "Forwarding order upstream"
    );

    ProxyResponse::from(proxy.forward(&destination, &payload).await)
}
