//! Persisted settings document (`settings.json` next to the executable).
//!
//! Loading never fails: a missing or unreadable file gives the defaults, and a
//! file where only some keys are valid keeps those keys. Saving always writes
//! the whole document.

use crate::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SETTINGS_FILE: &str = "settings.json";

/// Seconds; the adjust gesture and presets are clamped to these bounds.
pub const WORK_MIN_SECS: u32 = 5 * 60;
pub const WORK_MAX_SECS: u32 = 60 * 60;
pub const REST_MIN_SECS: u32 = 30;
pub const REST_MAX_SECS: u32 = 15 * 60;

/// Geometry of the widgets layered over the character image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub timer_offset_x: i32,
    pub timer_offset_y: i32,
    pub font_size: u32,
    pub menu_scale: f64,
    /// Keys written by other front-ends are kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            timer_offset_x: 100,
            timer_offset_y: 100,
            font_size: 22,
            menu_scale: 1.0,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub work_duration: u32,
    pub rest_duration: u32,
    pub always_on_top: bool,
    pub voice_interval_minutes: u32,
    pub exit_on_work_end: bool,
    pub exit_voice_enabled: bool,
    pub check_updates_enabled: bool,
    pub sounds_update_url: String,
    pub layout_config: LayoutConfig,
    /// `MMDD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: 40 * 60,
            rest_duration: 15 * 60,
            always_on_top: true,
            voice_interval_minutes: 10,
            exit_on_work_end: false,
            exit_voice_enabled: true,
            check_updates_enabled: true,
            sounds_update_url: String::new(),
            layout_config: LayoutConfig::default(),
            birthday: None,
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }
}

impl Settings {
    /// Return the full path of the settings file under `base`
    pub fn settings_file(base: &Path) -> PathBuf {
        base.join(SETTINGS_FILE)
    }

    /// Load settings from `base`, or return defaults on any failure.
    pub fn load(base: &Path) -> Self {
        let path = Self::settings_file(base);
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings");
                return Self::default();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(doc) => Self::from_value(doc),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings file is not valid JSON");
                Self::default()
            }
        }
    }

    /// Build settings from a parsed document, keeping every key that is valid
    /// on its own and defaulting the rest. Out-of-range durations are clamped,
    /// and `layout_config` is merged one key at a time too.
    pub fn from_value(doc: Value) -> Self {
        if let Ok(settings) = serde_json::from_value::<Settings>(doc.clone()) {
            return settings.sanitized();
        }

        let Value::Object(incoming) = doc else {
            warn!("settings document is not an object, using defaults");
            return Self::default();
        };

        let incoming = incoming
            .into_iter()
            .map(|(key, value)| {
                let value = match (key.as_str(), value) {
                    ("work_duration", v) => clamp_number(v, WORK_MIN_SECS, WORK_MAX_SECS),
                    ("rest_duration", v) => clamp_number(v, REST_MIN_SECS, REST_MAX_SECS),
                    ("layout_config", Value::Object(layout)) => {
                        Value::Object(merge_keys::<LayoutConfig>(layout, "layout_config"))
                    }
                    (_, v) => v,
                };
                (key, value)
            })
            .collect();

        serde_json::from_value::<Settings>(Value::Object(merge_keys::<Settings>(
            incoming, "settings",
        )))
        .map(Settings::sanitized)
        .unwrap_or_default()
    }

    /// Write the complete document, replacing the previous file.
    pub fn save(&self, base: &Path) -> AppResult<()> {
        let path = Self::settings_file(base);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
            .map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Save, logging instead of failing.
    pub fn save_or_warn(&self, base: &Path) {
        if let Err(e) = self.save(base) {
            warn!(error = %e, "failed to save settings");
        }
    }

    fn sanitized(mut self) -> Self {
        self.work_duration = clamp_work(self.work_duration);
        self.rest_duration = clamp_rest(self.rest_duration);
        if let Some(b) = &self.birthday
            && crate::utils::date::parse_mmdd(b).is_none()
        {
            self.birthday = None;
        }
        self
    }
}

/// Overlay `incoming` on the defaults of `T`, one key at a time, dropping
/// any key that would make the document fail to deserialize.
fn merge_keys<T>(incoming: Map<String, Value>, section: &str) -> Map<String, Value>
where
    T: Default + Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(T::default()) {
        Ok(Value::Object(m)) => m,
        _ => Map::new(),
    };
    for (key, value) in incoming {
        let previous = merged.insert(key.clone(), value);
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            warn!(section, key = %key, "ignoring invalid settings value");
            match previous {
                Some(p) => merged.insert(key, p),
                None => merged.remove(&key),
            };
        }
    }
    merged
}

/// Any JSON number, clamped into `min..=max`; other values pass through.
fn clamp_number(value: Value, min: u32, max: u32) -> Value {
    match value.as_f64() {
        Some(n) => Value::from(n.clamp(f64::from(min), f64::from(max)).round() as u32),
        None => value,
    }
}

pub fn clamp_work(secs: u32) -> u32 {
    secs.clamp(WORK_MIN_SECS, WORK_MAX_SECS)
}

pub fn clamp_rest(secs: u32) -> u32 {
    secs.clamp(REST_MIN_SECS, REST_MAX_SECS)
}
