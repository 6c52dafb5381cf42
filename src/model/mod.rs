pub mod app_state;
pub mod claim;
pub mod configuration;
pub mod coupon;
pub mod errors;
pub mod login_info;
pub mod lottery;
