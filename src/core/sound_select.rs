//! Picks one clip for an event.
//!
//! Priority, highest first:
//!  1. tag pool for the current tag
//!  2. holiday pool, the first time a category plays on a holiday
//!  3. base + season + holiday, for later plays on the same holiday
//!  4. base + active season pools
//!  5. the category's default file
//!  6. silence
//!
//! Choice within the winning pool is uniform with replacement.

use crate::core::assets::AssetResolver;
use crate::core::calendar::CalendarConfig;
use crate::core::environment::Environment;
use crate::core::sound_pool::SoundPoolSet;
use crate::models::category::Category;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    Tag,
    Holiday,
    Mixed,
    Season,
    Base,
    DefaultFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Clip { path: PathBuf, source: PoolSource },
    Silence,
}

impl Selection {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Selection::Clip { path, .. } => Some(path),
            Selection::Silence => None,
        }
    }

    pub fn source(&self) -> Option<PoolSource> {
        match self {
            Selection::Clip { source, .. } => Some(*source),
            Selection::Silence => None,
        }
    }
}

pub struct SoundSelector {
    calendar: CalendarConfig,
    tag: Option<String>,
    season_override: Option<String>,
    birthday: Option<String>,
    /// Day on which each category last played under holiday priority.
    holiday_played: HashMap<Category, NaiveDate>,
    rng: StdRng,
}

impl SoundSelector {
    pub fn new(env: &Environment, calendar: CalendarConfig, birthday: Option<String>) -> Self {
        Self {
            calendar,
            tag: env.tag.clone(),
            season_override: env.season_override.clone(),
            birthday,
            holiday_played: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic choices, for tests and reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn calendar(&self) -> &CalendarConfig {
        &self.calendar
    }

    pub fn set_birthday(&mut self, birthday: Option<String>) {
        self.birthday = birthday;
    }

    pub fn active_holidays(&self, date: NaiveDate) -> Vec<String> {
        self.calendar.active_holidays(date, self.birthday.as_deref())
    }

    pub fn active_seasons(&self, date: NaiveDate) -> Vec<String> {
        self.calendar.active_seasons(date, self.season_override.as_deref())
    }

    /// Select with the category's own default file as the last resort.
    pub fn select(
        &mut self,
        pools: &SoundPoolSet,
        assets: &AssetResolver,
        cat: Category,
        date: NaiveDate,
    ) -> Selection {
        self.select_with_default(pools, assets, cat, Some(cat.default_file()), date)
    }

    pub fn select_with_default(
        &mut self,
        pools: &SoundPoolSet,
        assets: &AssetResolver,
        cat: Category,
        default_file: Option<&str>,
        date: NaiveDate,
    ) -> Selection {
        let selection = self.select_from_pools(pools, cat, date).unwrap_or_else(|| {
            default_file
                .map(|name| assets.sound(name))
                .filter(|p| p.exists())
                .map(|path| Selection::Clip {
                    path,
                    source: PoolSource::DefaultFile,
                })
                .unwrap_or(Selection::Silence)
        });
        debug!(category = %cat, ?selection, "sound selected");
        selection
    }

    fn select_from_pools(
        &mut self,
        pools: &SoundPoolSet,
        cat: Category,
        date: NaiveDate,
    ) -> Option<Selection> {
        let pool = pools.pool(cat);

        if let Some(tag) = &self.tag
            && let Some(clips) = pool.and_then(|p| p.tags.get(tag))
            && let Some(path) = clips.choose(&mut self.rng)
        {
            return Some(clip(path, PoolSource::Tag));
        }

        let base: Vec<PathBuf> = pool.map(|p| p.base.clone()).unwrap_or_default();
        let seasonal: Vec<PathBuf> = self
            .active_seasons(date)
            .iter()
            .filter_map(|s| pool.and_then(|p| p.seasons.get(s)))
            .flatten()
            .cloned()
            .collect();

        let holidays = self.active_holidays(date);
        let holiday_clips = pools.holiday_clips(cat, &holidays);
        if !holiday_clips.is_empty() {
            if self.holiday_played.get(&cat) != Some(&date) {
                self.holiday_played.insert(cat, date);
                return holiday_clips
                    .choose(&mut self.rng)
                    .map(|p| clip(p, PoolSource::Holiday));
            }
            let mixed: Vec<PathBuf> = base
                .into_iter()
                .chain(seasonal)
                .chain(holiday_clips)
                .collect();
            return mixed.choose(&mut self.rng).map(|p| clip(p, PoolSource::Mixed));
        }

        let source = if seasonal.is_empty() {
            PoolSource::Base
        } else {
            PoolSource::Season
        };
        let combined: Vec<PathBuf> = base.into_iter().chain(seasonal).collect();
        combined.choose(&mut self.rng).map(|p| clip(p, source))
    }

    /// A holiday greeting clip, if any active holiday has one.
    pub fn greeting(&mut self, pools: &SoundPoolSet, date: NaiveDate) -> Option<PathBuf> {
        let holidays = self.active_holidays(date);
        pools.greeting_clips(&holidays).choose(&mut self.rng).cloned()
    }
}

fn clip(path: &Path, source: PoolSource) -> Selection {
    Selection::Clip {
        path: path.to_path_buf(),
        source,
    }
}
