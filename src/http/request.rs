//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Decode the order proxy body into one of its two accepted shapes
//! - Resolve the upstream destination for that shape
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body shape is decided once, up front, into an explicit enum

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::upstream::ProxyError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues a fresh UUID v4 for requests that arrive without an id.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request id set by the request-id layer, for log fields.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The two body shapes accepted by the order proxy.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyRequest {
    /// `{ "url": ..., "payload": ... }`: caller names the destination.
    Addressed { url: String, payload: Value },
    /// Any other JSON value, sent to the configured default destination.
    Bare(Value),
}

impl ProxyRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, ProxyError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ProxyError::MalformedBody(e.to_string()))?;
        Self::from_value(value)
    }

    /// An object with a `url` key is addressed; the key must hold a
    /// non-empty string or there is no destination at all.
    pub fn from_value(value: Value) -> Result<Self, ProxyError> {
        match value {
            Value::Object(mut fields) if fields.contains_key("url") => {
                let payload = fields.remove("payload").unwrap_or(Value::Null);
                match fields.remove("url") {
                    Some(Value::String(url)) if !url.trim().is_empty() => {
                        Ok(ProxyRequest::Addressed { url, payload })
                    }
                    _ => Err(ProxyError::MissingDestination),
                }
            }
            other => Ok(ProxyRequest::Bare(other)),
        }
    }

    /// Destination URL plus payload, or `MissingDestination` when a bare
    /// payload arrives and no default is configured.
    pub fn resolve(self, default_destination: Option<&str>) -> Result<(String, Value), ProxyError> {
        match self {
            ProxyRequest::Addressed { url, payload } => Ok((url, payload)),
            ProxyRequest::Bare(payload) => default_destination
                .map(|d| (d.to_string(), payload))
                .ok_or(ProxyError::MissingDestination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_addressed_shape() {
        let req = ProxyRequest::from_slice(br#"{"url":"https://up/order","payload":{"a":1}}"#).unwrap();
        assert_eq!(
            req,
            ProxyRequest::Addressed {
                url: "https://up/order".into(),
                payload: json!({"a": 1}),
            }
        );
        let (dest, payload) = req.resolve(Some("https://default/order")).unwrap();
        assert_eq!(dest, "https://up/order");
        assert_eq!(payload, json!({"a": 1}));
    }

    #[test]
    fn test_bare_shapes() {
        let object = ProxyRequest::from_slice(br#"{"order":{"order_id":"1"}}"#).unwrap();
        assert_eq!(object, ProxyRequest::Bare(json!({"order": {"order_id": "1"}})));

        let array = ProxyRequest::from_slice(b"[1,2,3]").unwrap();
        assert_eq!(array, ProxyRequest::Bare(json!([1, 2, 3])));

        let (dest, _) = array.resolve(Some("https://default/order")).unwrap();
        assert_eq!(dest, "https://default/order");
    }

    #[test]
    fn test_bare_without_default_is_missing_destination() {
        let req = ProxyRequest::from_slice(br#"{"a":1}"#).unwrap();
        assert_eq!(req.resolve(None), Err(ProxyError::MissingDestination));
    }

    #[test]
    fn test_url_key_without_usable_string() {
        for body in [r#"{"url":null,"payload":1}"#, r#"{"url":""}"#, r#"{"url":42}"#] {
            assert_eq!(
                ProxyRequest::from_slice(body.as_bytes()),
                Err(ProxyError::MissingDestination),
                "body {}",
                body
            );
        }
    }

    #[test]
    fn test_addressed_without_payload_sends_null() {
        let req = ProxyRequest::from_slice(br#"{"url":"http://x"}"#).unwrap();
        let (_, payload) = req.resolve(None).unwrap();
        assert_eq!(payload, Value::Null);
    }

    #[test]
    fn test_malformed_body() {
        let bodies: [&[u8]; 3] = [b"", b"{not json", b"\xff\xfe"];
        for body in bodies {
            assert!(matches!(
                ProxyRequest::from_slice(body),
                Err(ProxyError::MalformedBody(_))
            ));
        }
    }
}
