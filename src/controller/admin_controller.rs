use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::coupon::{
    CouponListResponse, CouponUsesResponse, CreateCouponResponse, DeleteCouponRequest,
    MessageResponse,
};
use crate::shared::coupon_service;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn config_admin_controller() -> Router<AppState> {
    Router::new()
        .route("/admin/coupons", get(get_coupons))
        .route("/admin/coupons/create", post(create_coupon))
        .route("/admin/coupons/delete", post(delete_coupon))
        .route("/admin/coupons/uses", get(get_coupon_uses))
        .route("/admin/lotto/refresh", post(refresh_latest_draw))
}

async fn get_coupons(_claim: Claim, State(state): State<AppState>) -> Response {
    match coupon_service::get_all_coupons(&state.pool).await {
        Ok(coupons) => (
            StatusCode::OK,
            Json(CouponListResponse {
                success: true,
                coupons,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_coupon(_claim: Claim, State(state): State<AppState>) -> Response {
    match coupon_service::create_coupon(&state.pool, &state.coupon_codes).await {
        Ok(coupon) => (
            StatusCode::CREATED,
            Json(CreateCouponResponse {
                success: true,
                coupon,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_coupon(
    _claim: Claim,
    State(state): State<AppState>,
    Json(payload): Json<DeleteCouponRequest>,
) -> Response {
    match coupon_service::delete_coupon(&state.pool, payload.coupon_id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse {
                success: true,
                message: format!("Coupon ID {} deleted.", payload.coupon_id),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_coupon_uses(_claim: Claim, State(state): State<AppState>) -> Response {
    match coupon_service::get_all_coupon_uses(&state.pool).await {
        Ok(coupon_uses) => (
            StatusCode::OK,
            Json(CouponUsesResponse {
                success: true,
                coupon_uses,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn refresh_latest_draw(claim: Claim, State(state): State<AppState>) -> Response {
    state.draws.invalidate().await;
    tracing::info!("Latest draw cache invalidated by {}.", &claim.sub);
    (
        StatusCode::OK,
        Json(MessageResponse {
            success: true,
            message: "The latest draw will be fetched again on the next request.".to_string(),
        }),
    )
        .into_response()
}
