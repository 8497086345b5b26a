use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `MMDD` string into (month, day), rejecting impossible dates.
/// February 29 is accepted.
pub fn parse_mmdd(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month: u32 = s[..2].parse().ok()?;
    let day: u32 = s[2..].parse().ok()?;
    // 2000 is a leap year, so every real month/day pair exists in it
    NaiveDate::from_ymd_opt(2000, month, day).map(|_| (month, day))
}

/// Parse a `MM-DD` string into (month, day).
pub fn parse_month_day(s: &str) -> Option<(u32, u32)> {
    let (m, d) = s.trim().split_once('-')?;
    let month: u32 = m.parse().ok()?;
    let day: u32 = d.parse().ok()?;
    NaiveDate::from_ymd_opt(2000, month, day).map(|_| (month, day))
}

/// Inclusive month/day range check that wraps over the year end
/// (e.g. 12-20 .. 01-05).
pub fn in_month_day_range(date: NaiveDate, start: (u32, u32), end: (u32, u32)) -> bool {
    let md = (date.month(), date.day());
    if start <= end {
        start <= md && md <= end
    } else {
        md >= start || md <= end
    }
}
