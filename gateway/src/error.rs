use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Canonical upstream status kinds the gateway understands, independent of
/// any one back-end's wire format (§4.C3c).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Unauthenticated,
    PermissionDenied,
    ResourceExhausted,
    Aborted,
    Canceled,
    DeadlineExceeded,
    Unavailable,
    Unimplemented,
    Internal,
}

impl UpstreamKind {
    /// §4.C3c's table: upstream kind → (HTTP status, stable short code).
    pub fn http(self) -> (StatusCode, &'static str) {
        match self {
            UpstreamKind::InvalidArgument => (StatusCode::BAD_REQUEST, "invalid_argument"),
            UpstreamKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            UpstreamKind::AlreadyExists => (StatusCode::CONFLICT, "already_exists"),
            UpstreamKind::FailedPrecondition => (StatusCode::PRECONDITION_FAILED, "failed_precondition"),
            UpstreamKind::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            UpstreamKind::PermissionDenied => (StatusCode::FORBIDDEN, "permission_denied"),
            UpstreamKind::ResourceExhausted => (StatusCode::TOO_MANY_REQUESTS, "resource_exhausted"),
            UpstreamKind::Aborted => (StatusCode::CONFLICT, "aborted"),
            UpstreamKind::Canceled => (StatusCode::from_u16(499).unwrap(), "canceled"),
            UpstreamKind::DeadlineExceeded => (StatusCode::GATEWAY_TIMEOUT, "deadline_exceeded"),
            UpstreamKind::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            UpstreamKind::Unimplemented => (StatusCode::NOT_IMPLEMENTED, "unimplemented"),
            UpstreamKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// A gateway-level error carrying an upstream kind and a short, safe
/// message. Implements `IntoResponse` so handlers can `?`-propagate it;
/// request-id population happens via [`GatewayError::with_request_id`]
/// since `IntoResponse` alone has no access to the request.
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub kind: UpstreamKind,
    pub message: String,
    pub request_id: Option<String>,
}

impl GatewayError {
    pub fn new(kind: UpstreamKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), request_id: None }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(UpstreamKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(UpstreamKind::NotFound, message)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = self.kind.http();
        let body = ErrorEnvelope {
            error: ErrorBody { code, message: self.message, request_id: self.request_id },
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the standard error envelope straight from a kind, used by the
/// Recover middleware (which has no `GatewayError` to work with — only a
/// caught panic) and by anywhere a `None` upstream kind must still resolve
/// to 500/`internal` rather than silently succeeding (§9: "a nil error
/// passed to the mapper is itself a programming bug").
pub fn map_error(kind: Option<UpstreamKind>, message: &str, request_id: Option<String>) -> Response {
    let kind = kind.unwrap_or(UpstreamKind::Internal);
    GatewayError::new(kind, message).with_request_id(request_id).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_spec_status_and_code_pairs() {
        let cases = [
            (UpstreamKind::InvalidArgument, 400, "invalid_argument"),
            (UpstreamKind::NotFound, 404, "not_found"),
            (UpstreamKind::AlreadyExists, 409, "already_exists"),
            (UpstreamKind::FailedPrecondition, 412, "failed_precondition"),
            (UpstreamKind::Unauthenticated, 401, "unauthenticated"),
            (UpstreamKind::PermissionDenied, 403, "permission_denied"),
            (UpstreamKind::ResourceExhausted, 429, "resource_exhausted"),
            (UpstreamKind::Aborted, 409, "aborted"),
            (UpstreamKind::Canceled, 499, "canceled"),
            (UpstreamKind::DeadlineExceeded, 504, "deadline_exceeded"),
            (UpstreamKind::Unavailable, 503, "unavailable"),
            (UpstreamKind::Unimplemented, 501, "unimplemented"),
            (UpstreamKind::Internal, 500, "internal"),
        ];
        for (kind, status, code) in cases {
            let (got_status, got_code) = kind.http();
            assert_eq!(got_status.as_u16(), status, "{code}");
            assert_eq!(got_code, code);
        }
    }

    #[test]
    fn nil_error_maps_to_internal_never_200() {
        let response = map_error(None, "boom", None);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
