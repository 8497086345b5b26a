//! Process-wide context: base paths and `POMODORO_*` flags, read once at
//! startup and passed to every component that needs them.

use crate::utils::path::{executable_dir, parallel_dir};
use std::path::{Path, PathBuf};

pub const ENV_SOUNDS_URL: &str = "POMODORO_SOUNDS_URL";
pub const ENV_SEASON: &str = "POMODORO_SEASON";
pub const ENV_TAG: &str = "POMODORO_TAG";
pub const ENV_THEME: &str = "POMODORO_THEME";
pub const ENV_TEN_ENABLE: &str = "POMODORO_TEN_ENABLE";
pub const ENV_PLAYER: &str = "POMODORO_PLAYER";

const BUNDLE_DIR_NAME: &str = "pomodoro-pet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Directory holding settings, `assets/` and `sounds/`.
    pub base_dir: PathBuf,
    /// Parent of `base_dir`, for the shared-assets layout.
    pub parallel_root: Option<PathBuf>,
    /// Assets installed with the application.
    pub bundle_dir: Option<PathBuf>,
    pub sounds_url: Option<String>,
    pub season_override: Option<String>,
    pub tag: Option<String>,
    pub interval_voice_enabled: bool,
    /// Player command line; `none` switches audio off.
    pub player: Option<String>,
}

impl Environment {
    /// Read the real process environment.
    pub fn detect(base_override: Option<PathBuf>) -> Self {
        let base = base_override.unwrap_or_else(executable_dir);
        let bundle = dirs::data_dir().map(|d| d.join(BUNDLE_DIR_NAME));
        Self::from_lookup(base, bundle, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(base_dir: PathBuf, bundle_dir: Option<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let parallel_root = base_dir.parent().map(Path::to_path_buf);

        Self {
            sounds_url: non_empty(ENV_SOUNDS_URL),
            season_override: non_empty(ENV_SEASON).map(|s| s.to_lowercase()),
            tag: non_empty(ENV_TAG)
                .or_else(|| non_empty(ENV_THEME))
                .map(|s| s.to_lowercase()),
            interval_voice_enabled: flag_enabled(lookup(ENV_TEN_ENABLE).as_deref(), true),
            player: non_empty(ENV_PLAYER),
            parallel_root,
            bundle_dir,
            base_dir,
        }
    }

    /// Environment rooted at `base` with no overrides; used by tests and tools.
    pub fn for_base(base: impl Into<PathBuf>) -> Self {
        Self::from_lookup(base.into(), None, |_| None)
    }

    pub fn sounds_dir(&self) -> PathBuf {
        self.base_dir.join("sounds")
    }

    pub fn parallel_sounds_dir(&self) -> Option<PathBuf> {
        parallel_dir(&self.base_dir, "sounds")
    }

    /// Root populated by the download manager.
    pub fn cloud_dir(&self) -> PathBuf {
        self.sounds_dir().join("cloud")
    }

    pub fn calendar_file(&self) -> PathBuf {
        self.base_dir.join("calendar_config.json")
    }
}

/// Interpret a boolean environment value. Unset keeps `default`; once set,
/// only `1`, `true`, `yes` and `on` enable.
pub fn flag_enabled(value: Option<&str>, default: bool) -> bool {
    value.map_or(default, |v| {
        matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
    })
}
