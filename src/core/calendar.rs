//! Season and holiday calendar (`calendar_config.json`, optional).
//!
//! ```json
//! {
//!   "seasons":  [{ "id": "spring", "months": [3, 4, 5] },
//!                { "id": "sakura", "month": 4, "start_day": 1, "end_day": 10 }],
//!   "holidays": [{ "id": "newyear", "month": 1, "days": [1] }]
//! }
//! ```
//!
//! `holidays` may also use the older object form
//! `{ "xmas": { "start": "12-24", "end": "12-26" } }`.

use crate::utils::date::{in_month_day_range, parse_mmdd, parse_month_day};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const BIRTHDAY_ID: &str = "birthday";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub months: Vec<u32>,
    pub month: Option<u32>,
    #[serde(default)]
    pub days: Vec<u32>,
    pub start_day: Option<u32>,
    pub end_day: Option<u32>,
}

impl SeasonRule {
    fn matches(&self, date: NaiveDate) -> bool {
        let (m, d) = (date.month(), date.day());
        if self.months.contains(&m) {
            return true;
        }
        if self.month != Some(m) {
            return false;
        }
        if self.days.contains(&d) {
            return true;
        }
        matches!((self.start_day, self.end_day), (Some(s), Some(e)) if s <= d && d <= e)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayRule {
    #[serde(default)]
    pub id: String,
    pub month: Option<u32>,
    #[serde(default)]
    pub days: Vec<u32>,
    /// `MM-DD`, inclusive
    pub start: Option<String>,
    pub end: Option<String>,
}

impl HolidayRule {
    fn matches(&self, date: NaiveDate) -> bool {
        if self.month == Some(date.month()) && self.days.contains(&date.day()) {
            return true;
        }
        let range = self
            .start
            .as_deref()
            .and_then(parse_month_day)
            .zip(self.end.as_deref().and_then(parse_month_day));
        match range {
            Some((start, end)) => in_month_day_range(date, start, end),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HolidayRules {
    List(Vec<HolidayRule>),
    Map(BTreeMap<String, HolidayRule>),
}

impl Default for HolidayRules {
    fn default() -> Self {
        HolidayRules::List(Vec::new())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawCalendar {
    #[serde(default)]
    seasons: Vec<SeasonRule>,
    #[serde(default)]
    holidays: HolidayRules,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarConfig {
    pub seasons: Vec<SeasonRule>,
    pub holidays: Vec<HolidayRule>,
}

impl CalendarConfig {
    /// Load the calendar, or an empty one (default seasons only) on any failure.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no calendar config, using default seasons");
            return Self::default();
        }
        match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| Self::parse(&text).map_err(|e| e.to_string()))
        {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load calendar config");
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCalendar = serde_json::from_str(text)?;
        let holidays = match raw.holidays {
            HolidayRules::List(list) => list,
            HolidayRules::Map(map) => map
                .into_iter()
                .map(|(id, mut rule)| {
                    rule.id = id;
                    rule
                })
                .collect(),
        };
        Ok(Self {
            seasons: raw.seasons.into_iter().filter(|s| !s.id.is_empty()).collect(),
            holidays: holidays.into_iter().filter(|h| !h.id.is_empty()).collect(),
        })
    }

    /// Holidays active on `date`. The birthday (`MMDD`) counts as holiday `birthday`.
    pub fn active_holidays(&self, date: NaiveDate, birthday: Option<&str>) -> Vec<String> {
        let mut active = Vec::new();
        if let Some((m, d)) = birthday.and_then(parse_mmdd)
            && date.month() == m
            && date.day() == d
        {
            active.push(BIRTHDAY_ID.to_string());
        }
        for rule in &self.holidays {
            let id = rule.id.to_lowercase();
            if rule.matches(date) && !active.contains(&id) {
                active.push(id);
            }
        }
        active
    }

    /// Seasons active on `date`; several may overlap. An override replaces the
    /// calendar entirely, and an empty result falls back to meteorological quarters.
    pub fn active_seasons(&self, date: NaiveDate, season_override: Option<&str>) -> Vec<String> {
        if let Some(s) = season_override {
            return vec![s.to_lowercase()];
        }
        let mut active: Vec<String> = Vec::new();
        for rule in &self.seasons {
            let id = rule.id.to_lowercase();
            if rule.matches(date) && !active.contains(&id) {
                active.push(id);
            }
        }
        if active.is_empty() {
            active.push(default_season(date.month()).to_string());
        }
        active
    }

    /// Every id that names a holiday, used to file scanned folders.
    pub fn holiday_ids(&self) -> Vec<String> {
        let mut ids = vec![BIRTHDAY_ID.to_string()];
        for rule in &self.holidays {
            let id = rule.id.to_lowercase();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

pub fn default_season(month: u32) -> &'static str {
    match month {
        3..=5 => "spring",
        6..=8 => "summer",
        9..=11 => "autumn",
        _ => "winter",
    }
}
