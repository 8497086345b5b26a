use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_GREY: &str = "\x1b[90m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";

/// Outcome of one inventory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Missing but the app has a fallback.
    Optional,
    Missing,
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!("\n{}{}== {}{}", FG_BLUE, BOLD, msg, RESET);
}

/// `  label ........ OK` style inventory line.
pub fn status<T: fmt::Display>(label: T, status: Status, detail: &str) {
    let (color, word) = match status {
        Status::Ok => (FG_GREEN, "OK"),
        Status::Optional => (FG_GREY, "missing (optional)"),
        Status::Missing => (FG_RED, "MISSING"),
    };
    let label = format!("{label}");
    if detail.is_empty() {
        println!("  {:<28} {}{}{}", label, color, word, RESET);
    } else {
        println!("  {:<28} {}{}{} {}", label, color, word, RESET, detail);
    }
}
