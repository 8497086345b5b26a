//! Inventory behind `--check-resources`.

use crate::config::Settings;
use crate::core::assets::AssetResolver;
use crate::core::calendar::CalendarConfig;
use crate::core::download::{DownloadManager, SoundSource};
use crate::core::environment::Environment;
use crate::core::sound_pool::{SoundPoolSet, clips_in};
use crate::models::category::Category;
use crate::ui::messages::{Status, header, info, status};
use crate::utils::formatting::join_or_none;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Animations: (name, required)
const ANIMATIONS: [(&str, bool); 4] = [
    ("idle", true),
    ("paused", true),
    ("working", false),
    ("resting", false),
];
const OPTIONAL_IMAGES: [&str; 2] = ["resume.png", "start_btn.png"];
const MENU_ICONS: [&str; 5] = ["pause.png", "setting.png", "pin.png", "exit.png", "check.png"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCount {
    pub category: Category,
    pub base: usize,
    pub seasons: usize,
    pub holidays: usize,
    pub tags: usize,
    pub default_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    /// (name, frame count, required)
    pub animations: Vec<(String, usize, bool)>,
    pub optional_images: Vec<(String, bool)>,
    pub menu_icons: Vec<(String, bool)>,
    pub digits_complete: bool,
    pub window_icon: Option<PathBuf>,
    pub pools: Vec<PoolCount>,
    pub cloud_clips: usize,
    pub settings_present: bool,
    pub calendar_present: bool,
    pub active_seasons: Vec<String>,
    pub active_holidays: Vec<String>,
    pub update_source: Option<SoundSource>,
}

impl ResourceReport {
    pub fn collect(env: &Environment, today: NaiveDate) -> Self {
        let assets = AssetResolver::new(env);
        let settings = Settings::load(&env.base_dir);
        let calendar = CalendarConfig::load(&env.calendar_file());
        let pools = SoundPoolSet::build(env, &calendar);

        let animations = ANIMATIONS
            .iter()
            .map(|(name, required)| (name.to_string(), assets.frames(name).len(), *required))
            .collect();
        let optional_images = OPTIONAL_IMAGES
            .iter()
            .map(|name| (name.to_string(), assets.resolve(name).exists()))
            .collect();
        let menu_icons = MENU_ICONS
            .iter()
            .map(|name| {
                let found = assets.resolve(&format!("menu/{name}")).exists()
                    || assets.resolve(name).exists();
                (name.to_string(), found)
            })
            .collect();
        let digits_complete = (0..10).all(|d| assets.resolve(&format!("digits/{d}.png")).exists());

        let active_seasons = calendar.active_seasons(today, env.season_override.as_deref());
        let active_holidays = calendar.active_holidays(today, settings.birthday.as_deref());
        let window_icon = assets.season_icon(&active_holidays, &active_seasons);

        let pools = Category::ALL
            .iter()
            .map(|&category| {
                let (base, seasons, holidays, tags) = pools
                    .pool(category)
                    .map(|p| {
                        (
                            p.base.len(),
                            pool_sum(&p.seasons),
                            pool_sum(&p.holidays),
                            pool_sum(&p.tags),
                        )
                    })
                    .unwrap_or_default();
                PoolCount {
                    category,
                    base,
                    seasons,
                    holidays,
                    tags,
                    default_file: assets.sound(category.default_file()).exists(),
                }
            })
            .collect();

        let cloud = env.cloud_dir();
        let cloud_clips = if cloud.is_dir() {
            WalkDir::new(&cloud)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_dir() && !is_git_internal(e.path()))
                .map(|e| clips_in(e.path()).len())
                .sum()
        } else {
            0
        };

        Self {
            animations,
            optional_images,
            menu_icons,
            digits_complete,
            window_icon,
            pools,
            cloud_clips,
            settings_present: Settings::settings_file(&env.base_dir).exists(),
            calendar_present: env.calendar_file().exists(),
            active_seasons,
            active_holidays,
            update_source: DownloadManager::new(env, &settings).source().cloned(),
        }
    }

    pub fn print(&self, env: &Environment) {
        info(format!("Resource check for {}", env.base_dir.display()));

        header("Images");
        for (name, frames, required) in &self.animations {
            let st = match (*frames, *required) {
                (0, true) => Status::Missing,
                (0, false) => Status::Optional,
                _ => Status::Ok,
            };
            let detail = if *frames > 1 {
                format!("({frames} frames)")
            } else {
                String::new()
            };
            status(format!("animation {name}"), st, &detail);
        }
        for (name, found) in &self.optional_images {
            status(name, optional(*found), "");
        }
        status("handwritten digits", optional(self.digits_complete), "");
        let icon = self
            .window_icon
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        status("window icon", optional(self.window_icon.is_some()), &icon);

        header("Menu icons");
        for (name, found) in &self.menu_icons {
            status(name, optional(*found), "");
        }

        header("Sounds");
        for p in &self.pools {
            let total = p.base + p.seasons + p.holidays + p.tags;
            let st = if total > 0 || p.default_file {
                Status::Ok
            } else {
                Status::Optional
            };
            let detail = format!(
                "base {} / season {} / holiday {} / tag {} / default file {}",
                p.base,
                p.seasons,
                p.holidays,
                p.tags,
                if p.default_file { "yes" } else { "no" }
            );
            status(format!("pool {}", p.category), st, &detail);
        }
        status(
            "cloud clips",
            optional(self.cloud_clips > 0),
            &self.cloud_clips.to_string(),
        );

        header("Configuration");
        status("settings.json", optional(self.settings_present), "");
        status("calendar_config.json", optional(self.calendar_present), "");
        info(format!("Active seasons:  {}", join_or_none(&self.active_seasons)));
        info(format!("Active holidays: {}", join_or_none(&self.active_holidays)));
        match &self.update_source {
            Some(SoundSource::Git(url)) => info(format!("Sound updates:   git {url}")),
            Some(SoundSource::Manifest(url)) => info(format!("Sound updates:   manifest {url}")),
            None => info("Sound updates:   not configured"),
        }
    }
}

fn pool_sum(map: &BTreeMap<String, Vec<PathBuf>>) -> usize {
    map.values().map(Vec::len).sum()
}

fn is_git_internal(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == ".git")
}

fn optional(found: bool) -> Status {
    if found { Status::Ok } else { Status::Optional }
}
