use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::login_info::{LoginCredential, LoginResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

pub fn config_login_controller() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

async fn login(State(state): State<AppState>, Json(request): Json<LoginCredential>) -> Response {
    if !state
        .auth
        .verifier
        .verify(&request.user_name, &request.password)
    {
        tracing::info!("Rejected admin login for {}.", &request.user_name);
        return (
            StatusCode::UNAUTHORIZED,
            Json(ServerError::with_message("Invalid user name or password.")),
        )
            .into_response();
    }

    let expiry = OffsetDateTime::now_utc() + Duration::hours(state.auth.token_lifetime_hours);
    match generate_jwt_token(&request.user_name, expiry, &state.auth.jwt_secret) {
        Ok(token) => {
            let login_response = LoginResponse {
                success: true,
                token,
                expiry: expiry.format(&Rfc3339).unwrap_or_default(),
            };
            (StatusCode::OK, Json(login_response)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to encode JWT token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message("Failed to issue a login token.")),
            )
                .into_response()
        }
    }
}

fn generate_jwt_token(
    user_name: &str,
    expiry: OffsetDateTime,
    secret: &str,
) -> jsonwebtoken::errors::Result<String> {
    let claim = Claim {
        sub: user_name.into(),
        exp: expiry.unix_timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
