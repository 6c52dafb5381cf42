pub const CONFIG_DIRECTORY: &str = "./config";
pub const STATIC_DIRECTORY: &str = "./static";

pub const DEFAULT_DRAW_API_URL: &str =
    "https://www.dhlottery.co.kr/common.do?method=getLottoNumber&drwNo=";

/// A hashtag needs this many redemptions of its own before it may reuse a
/// coupon that has already been claimed.
pub const REUSE_THRESHOLD: i64 = 5;

pub const NUMBERS_PER_SELECTION: usize = 6;
pub const MIN_LOTTO_NUMBER: u8 = 1;
pub const MAX_LOTTO_NUMBER: u8 = 45;

pub const MIN_COUPON_CODE_LENGTH: usize = 10;
pub const MAX_COUPON_CODE_LENGTH: usize = 12;
