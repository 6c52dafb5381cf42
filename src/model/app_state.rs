use crate::shared::credentials::CredentialVerifier;
use crate::shared::draw_cache::LatestDrawCache;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub draws: Arc<LatestDrawCache>,
    pub coupon_codes: CouponCodeSettings,
    pub auth: AuthSettings,
}

#[derive(Clone, Debug)]
pub struct CouponCodeSettings {
    pub prefix: Option<String>,
    pub length: usize,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_lifetime_hours: i64,
    pub verifier: Arc<dyn CredentialVerifier>,
}
