use rand::seq::SliceRandom;

const COUPON_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_coupon_code(prefix: Option<&str>, length: usize) -> String {
    let mut rng = rand::thread_rng();
    let random_part = (0..length)
        .filter_map(|_| COUPON_CODE_CHARSET.choose(&mut rng))
        .map(|b| *b as char)
        .collect::<String>();

    match prefix {
        Some(prefix) => format!("{}{}", prefix, random_part),
        None => random_part,
    }
}

/// Trims a free-text form field, treating blank input as missing.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
