use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use selection::*;

mod selection;

#[derive(Debug, Error)]
pub enum CouponError {
    #[error("The coupon code is not valid.")]
    InvalidCoupon,
    #[error("This coupon has already been used with the handle '{0}'.")]
    AlreadyUsedByThisHashtag(String),
    #[error(
        "The handle '{hashtag}' has only redeemed {count} coupon(s), but {threshold} are required to reuse a claimed coupon. Look for a coupon that has not been used yet!"
    )]
    HashtagNotEligible {
        hashtag: String,
        count: i64,
        threshold: i64,
    },
    #[error("Invalid lottery numbers: {0}")]
    InvalidNumbers(String),
    #[error("The field '{0}' cannot be empty.")]
    MissingField(&'static str),
    #[error("Coupon ID {0} does not exist.")]
    CouponNotFound(i64),
    #[error("Failed to generate a unique coupon code after {0} attempts.")]
    CodeGenerationExhausted(usize),
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] sqlx::Error),
}

#[derive(Deserialize, Serialize, sqlx::FromRow, Clone, Debug, PartialEq, Eq)]
pub struct Coupon {
    pub id: i64,
    pub coupon_code: String,
    pub is_used: bool,
}

#[derive(Deserialize, Serialize, sqlx::FromRow, Clone, Debug)]
pub struct CouponUseRow {
    pub id: i64,
    pub coupon_id: i64,
    pub coupon_code: Option<String>,
    pub youtube_hashtag: String,
    pub selected_numbers: String,
    pub used_at: String,
    pub draw_no: Option<i64>,
}

/// A usage record as shown to administrators. `coupon_code` is `None` once the
/// coupon itself has been deleted.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CouponUseRecord {
    pub id: i64,
    pub coupon_id: i64,
    pub coupon_code: Option<String>,
    pub youtube_hashtag: String,
    pub selected_numbers: Vec<u8>,
    pub used_at: String,
    pub draw_no: Option<i64>,
}

impl From<CouponUseRow> for CouponUseRecord {
    fn from(value: CouponUseRow) -> Self {
        CouponUseRecord {
            id: value.id,
            coupon_id: value.coupon_id,
            coupon_code: value.coupon_code,
            youtube_hashtag: value.youtube_hashtag,
            selected_numbers: parse_stored_numbers(&value.selected_numbers),
            used_at: value.used_at,
            draw_no: value.draw_no,
        }
    }
}

#[derive(Deserialize, Serialize, sqlx::FromRow, Clone, Debug)]
pub struct HashtagCouponRow {
    pub coupon_code: Option<String>,
    pub selected_numbers: String,
    pub used_at: String,
    pub draw_no: Option<i64>,
    pub draw_date: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct HashtagCoupon {
    pub coupon_code: Option<String>,
    pub selected_numbers: Vec<u8>,
    pub used_at: String,
    pub draw_no: Option<i64>,
    pub draw_date: Option<String>,
}

impl From<HashtagCouponRow> for HashtagCoupon {
    fn from(value: HashtagCouponRow) -> Self {
        HashtagCoupon {
            coupon_code: value.coupon_code,
            selected_numbers: parse_stored_numbers(&value.selected_numbers),
            used_at: value.used_at,
            draw_no: value.draw_no,
            draw_date: value.draw_date,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct HashtagLookup {
    pub data: Vec<HashtagCoupon>,
    pub used_coupons_count: i64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Redemption {
    pub message: String,
    pub draw_no: u32,
    pub draw_date: String,
    pub selected_numbers: Vec<u8>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct RedeemRequest {
    #[serde(default)]
    pub coupon_code: String,
    #[serde(default)]
    pub youtube_hashtag: String,
    #[serde(default)]
    pub selected_numbers: Vec<i64>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RedeemResponse {
    pub success: bool,
    #[serde(flatten)]
    pub redemption: Redemption,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct LookupQuery {
    pub hashtag: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub lookup: HashtagLookup,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CreateCouponResponse {
    pub success: bool,
    pub coupon: Coupon,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DeleteCouponRequest {
    pub coupon_id: i64,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CouponListResponse {
    pub success: bool,
    pub coupons: Vec<Coupon>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CouponUsesResponse {
    pub success: bool,
    pub coupon_uses: Vec<CouponUseRecord>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct StatsResponse {
    pub success: bool,
    pub total_coupon_uses: i64,
}
