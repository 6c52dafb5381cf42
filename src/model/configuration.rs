use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Configuration {
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_user_name: String,
    pub admin_password: String,
    pub server_bind_point: String,
    pub log_level: String,
    pub draw_api_url: String,
    pub latest_draw_ttl_hours: u64,
    pub coupon_code_prefix: Option<String>,
    pub coupon_code_length: usize,
    pub token_lifetime_hours: i64,
}
