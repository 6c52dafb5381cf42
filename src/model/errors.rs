use crate::model::coupon::CouponError;
use crate::model::lottery::DrawError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub type ApiError = (StatusCode, Json<ServerError>);

const GENERIC_FAILURE_MESSAGE: &str = "An internal server error occurred.";

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ServerError {
    pub success: bool,
    pub message: String,
}

impl ServerError {
    pub fn with_message<S: Into<String>>(message: S) -> Self {
        ServerError {
            success: false,
            message: message.into(),
        }
    }
}

impl From<String> for ServerError {
    fn from(str: String) -> Self {
        ServerError::with_message(str)
    }
}

impl From<&str> for ServerError {
    fn from(str: &str) -> Self {
        ServerError::with_message(str)
    }
}

impl IntoResponse for CouponError {
    fn into_response(self) -> Response {
        let status = match &self {
            CouponError::InvalidCoupon | CouponError::CouponNotFound(_) => StatusCode::NOT_FOUND,
            CouponError::AlreadyUsedByThisHashtag(_) | CouponError::HashtagNotEligible { .. } => {
                StatusCode::CONFLICT
            }
            CouponError::InvalidNumbers(_) | CouponError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            CouponError::StorageFailure(_) | CouponError::CodeGenerationExhausted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Coupon operation failed: {}", &self);
            (status, Json(ServerError::with_message(GENERIC_FAILURE_MESSAGE))).into_response()
        } else {
            (status, Json(ServerError::with_message(self.to_string()))).into_response()
        }
    }
}

impl IntoResponse for DrawError {
    fn into_response(self) -> Response {
        match &self {
            DrawError::DrawNotFound(_) | DrawError::NoLatestDraw => {
                (StatusCode::NOT_FOUND, Json(ServerError::from(self.to_string()))).into_response()
            }
            DrawError::UpstreamUnavailable(_) => {
                tracing::error!("Draw provider failed: {}", &self);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ServerError::with_message(
                        "The lottery result service is currently unavailable.",
                    )),
                )
                    .into_response()
            }
        }
    }
}
