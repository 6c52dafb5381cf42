use crate::model::app_state::AppState;
use crate::model::coupon::SelectedNumbers;
use crate::model::errors::ServerError;
use crate::model::lottery::{CheckNumbersRequest, CheckNumbersResponse, DrawResponse};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn config_lottery_controller() -> Router<AppState> {
    Router::new()
        .route("/lotto/latest", get(get_latest_draw))
        .route("/lotto/check", post(check_numbers))
        .route("/lotto/check/:draw_no", get(get_draw_by_number))
}

async fn get_latest_draw(State(state): State<AppState>) -> Response {
    match state.draws.latest_draw().await {
        Ok(data) => (StatusCode::OK, Json(DrawResponse { success: true, data })).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_draw_by_number(Path(draw_no): Path<u32>, State(state): State<AppState>) -> Response {
    match state.draws.draw(draw_no).await {
        Ok(data) => (StatusCode::OK, Json(DrawResponse { success: true, data })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Compares a selection with the winning numbers of the latest draw.
async fn check_numbers(
    State(state): State<AppState>,
    Json(payload): Json<CheckNumbersRequest>,
) -> Response {
    let selection = match SelectedNumbers::try_from(payload.selected_numbers.as_slice()) {
        Ok(selection) => selection,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ServerError::with_message(format!(
                    "Invalid lottery numbers: {}",
                    e
                ))),
            )
                .into_response()
        }
    };

    match state.draws.latest_draw().await {
        Ok(latest) => {
            let matched_numbers = selection
                .as_slice()
                .iter()
                .copied()
                .filter(|n| latest.draw_numbers.contains(n))
                .collect::<Vec<_>>();
            let bonus_matched = selection.as_slice().contains(&latest.bonus_number);

            (
                StatusCode::OK,
                Json(CheckNumbersResponse {
                    success: true,
                    latest_draw_no: latest.draw_no,
                    matched_numbers,
                    bonus_matched,
                }),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
