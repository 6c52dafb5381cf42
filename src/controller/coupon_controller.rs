use crate::model::app_state::AppState;
use crate::model::coupon::{
    LookupQuery, LookupResponse, RedeemRequest, RedeemResponse, StatsResponse,
};
use crate::shared::coupon_service::{self, RedemptionTicket};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn config_coupon_controller() -> Router<AppState> {
    Router::new()
        .route("/lotto/coupon/submit", post(submit_coupon))
        .route("/lotto/coupon/lookup", get(lookup_coupon))
        .route("/lotto/coupon/stats", get(get_coupon_stats))
}

async fn submit_coupon(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Response {
    let ticket = match RedemptionTicket::try_from(payload) {
        Ok(ticket) => ticket,
        Err(e) => return e.into_response(),
    };

    match coupon_service::redeem_coupon(&state.pool, &state.draws, ticket).await {
        Ok(redemption) => (
            StatusCode::OK,
            Json(RedeemResponse {
                success: true,
                redemption,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn lookup_coupon(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let hashtag = query.hashtag.unwrap_or_default();
    match coupon_service::lookup_hashtag(&state.pool, &hashtag).await {
        Ok(lookup) => (
            StatusCode::OK,
            Json(LookupResponse {
                success: true,
                lookup,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_coupon_stats(State(state): State<AppState>) -> Response {
    match coupon_service::total_coupon_uses(&state.pool).await {
        Ok(total_coupon_uses) => (
            StatusCode::OK,
            Json(StatsResponse {
                success: true,
                total_coupon_uses,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
