//! Time utilities: clock text for the timer display.

/// `MM:SS`; minutes grow past two digits instead of wrapping.
pub fn format_mmss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn minutes_to_secs(minutes: u32) -> u32 {
    minutes.saturating_mul(60)
}
