use crate::controller::create_router;
use crate::db::initialize_db;
use crate::model::app_state::{AppState, AuthSettings, CouponCodeSettings};
use crate::shared::configuration::CONFIGURATION;
use crate::shared::credentials::StaticCredentials;
use crate::shared::draw_cache::LatestDrawCache;
use crate::shared::lotto_api::DhLotteryClient;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

mod controller;
mod db;
mod middleware;
mod model;
mod shared;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = tracing::Level::from_str(&CONFIGURATION.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let pool = initialize_db(&CONFIGURATION.database_url).await?;

    let provider = Arc::new(DhLotteryClient::new(CONFIGURATION.draw_api_url.clone()));
    let draws = LatestDrawCache::new(
        provider,
        Duration::from_secs(60 * 60 * CONFIGURATION.latest_draw_ttl_hours),
    );

    let state = AppState {
        pool,
        draws: Arc::new(draws),
        coupon_codes: CouponCodeSettings {
            prefix: CONFIGURATION.coupon_code_prefix.clone(),
            length: CONFIGURATION.coupon_code_length,
        },
        auth: AuthSettings {
            jwt_secret: CONFIGURATION.jwt_secret.clone(),
            token_lifetime_hours: CONFIGURATION.token_lifetime_hours,
            verifier: Arc::new(StaticCredentials::new(
                CONFIGURATION.admin_user_name.clone(),
                CONFIGURATION.admin_password.clone(),
            )),
        },
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&CONFIGURATION.server_bind_point).await?;
    tracing::info!("Listening on {}.", &CONFIGURATION.server_bind_point);
    axum::serve(listener, app).await?;
    Ok(())
}
