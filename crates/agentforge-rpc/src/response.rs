//! Response envelope and error-to-HTTP mapping.
//!
//! Grounded in the teacher's `kotoba_server_core::router::ApiResponse<T>`,
//! generalized here to carry a `ForgeError`-derived status code instead of
//! always answering `400` on failure.

use agentforge_errors::{Code, ForgeError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    pub field_path: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// 499 is nginx's non-standard "client closed request" status, reused here
/// per spec §6.3 for `Canceled` since `axum`'s `StatusCode` has no variant
/// of its own and the control plane only talks to its own trusted callers.
fn status_for(code: Code) -> StatusCode {
    match code {
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Canceled => StatusCode::from_u16(499).unwrap(),
    }
}

fn code_label(code: Code) -> &'static str {
    match code {
        Code::InvalidArgument => "invalid_argument",
        Code::NotFound => "not_found",
        Code::AlreadyExists => "already_exists",
        Code::FailedPrecondition => "failed_precondition",
        Code::Internal => "internal",
        Code::Canceled => "canceled",
    }
}

pub struct ApiErrorResponse(pub ForgeError);

impl From<ForgeError> for ApiErrorResponse {
    fn from(err: ForgeError) -> Self {
        ApiErrorResponse(err)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code_label(code),
                message: self.0.to_string(),
                field_path: self.0.field_path().map(str::to_string),
            }),
        };
        (status_for(code), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_code_to_a_distinct_status() {
        let codes = [
            Code::InvalidArgument,
            Code::NotFound,
            Code::AlreadyExists,
            Code::FailedPrecondition,
            Code::Internal,
            Code::Canceled,
        ];
        let statuses: std::collections::HashSet<_> = codes.iter().map(|c| status_for(*c)).collect();
        assert_eq!(statuses.len(), codes.len());
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(status_for(Code::NotFound), StatusCode::NOT_FOUND);
    }
}
