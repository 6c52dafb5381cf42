use time::macros::{date, format_description};
use time::{Date, Duration};

/// The first draw took place on Saturday 2002-12-07; draws follow weekly.
pub const FIRST_DRAW_DATE: Date = date!(2002 - 12 - 07);

pub fn draw_date(draw_no: u32) -> Date {
    FIRST_DRAW_DATE + Duration::weeks(i64::from(draw_no.saturating_sub(1)))
}

pub fn format_draw_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub fn next_draw_no(latest_draw_no: Option<u32>) -> u32 {
    latest_draw_no.map(|n| n + 1).unwrap_or(1)
}

/// Upper bound for the latest draw held on or before `today`. The draw of the
/// current week may not have been published yet.
pub fn estimate_latest_draw_no(today: Date) -> u32 {
    let days = (today - FIRST_DRAW_DATE).whole_days();
    if days < 0 {
        0
    } else {
        (days / 7 + 1) as u32
    }
}
