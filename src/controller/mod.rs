use crate::model::app_state::AppState;
use crate::model::errors::ServerError;
use crate::shared::constants::STATIC_DIRECTORY;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod admin_controller;
mod coupon_controller;
mod login_controller;
mod lottery_controller;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(lottery_controller::config_lottery_controller())
        .merge(coupon_controller::config_coupon_controller())
        .merge(login_controller::config_login_controller())
        .merge(admin_controller::config_admin_controller())
        .nest_service("/static", ServeDir::new(STATIC_DIRECTORY))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("A request handler panicked.");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ServerError::with_message(
            "An internal server error occurred.",
        )),
    )
        .into_response()
}
