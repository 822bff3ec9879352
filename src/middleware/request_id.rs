// ABOUTME: Request ID middleware for log correlation across a request's lifetime
// ABOUTME: Honours an inbound x-request-id header or generates one, echoes it, and stamps error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use fitgoal_core::errors::ErrorResponse;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id that is reused verbatim
const MAX_INBOUND_ID_LENGTH: usize = 128;

/// Largest error body rewritten to carry the request id
const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Correlation id for one request, available to handlers as an `Extension`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("req_{}", Uuid::new_v4().simple()))
    }

    /// Borrow the id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn inbound_id(request: &Request) -> Option<RequestId> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_INBOUND_ID_LENGTH
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
        .map(|id| RequestId(id.to_owned()))
}

fn is_json_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"))
}

/// Put `request_id` into an `{"error": {...}}` body that lacks one
///
/// Bodies that are not error envelopes pass through unchanged.
async fn stamp_error_body(response: Response, request_id: &RequestId) -> Response {
    if !is_json_error(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Error body not stamped with request id: {e}");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let Ok(mut envelope) = serde_json::from_slice::<ErrorResponse>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    envelope
        .error
        .request_id
        .get_or_insert_with(|| request_id.as_str().to_owned());

    match serde_json::to_vec(&envelope) {
        Ok(stamped) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(stamped))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

/// Attach a [`RequestId`] to the request, run the rest of the stack inside a
/// span carrying it, stamp error bodies with it, and set the response header
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = inbound_id(&request).unwrap_or_else(RequestId::generate);
    request.extensions_mut().insert(request_id.clone());

    let span = info_span!(
        "request",
        request_id = %request_id.as_str(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    let response = next.run(request).instrument(span).await;
    let mut response = stamp_error_body(response, &request_id).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use fitgoal_core::errors::AppError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_gets_request_id() {
        let id = RequestId("req_test".to_owned());
        let response = AppError::not_found("Goal").into_response();

        let stamped = stamp_error_body(response, &id).await;

        assert_eq!(stamped.status(), StatusCode::NOT_FOUND);
        let json = body_json(stamped).await;
        assert_eq!(json["error"]["request_id"], "req_test");
        assert_eq!(json["error"]["message"], "Goal not found");
    }

    #[tokio::test]
    async fn test_success_body_untouched() {
        let id = RequestId::generate();
        let response = axum::Json(serde_json::json!({"ok": true})).into_response();

        let json = body_json(stamp_error_body(response, &id).await).await;

        assert_eq!(json, serde_json::json!({"ok": true}));
        assert!(id.as_str().starts_with("req_"));
    }

    #[test]
    fn test_inbound_id_is_reused() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(inbound_id(&request), Some(RequestId("abc-123".to_owned())));
    }

    #[test]
    fn test_unsafe_inbound_id_is_replaced() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "bad id\twith spaces")
            .body(Body::empty())
            .unwrap();
        assert_eq!(inbound_id(&request), None);
    }
}
