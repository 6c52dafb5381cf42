use once_cell::sync::Lazy;

pub mod configuration;
pub mod constants;
pub mod coupon_service;
pub mod credentials;
pub mod draw_cache;
pub mod draw_calendar;
pub mod lotto_api;
#[cfg(test)]
pub mod test_utils;
pub mod util;

pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);
