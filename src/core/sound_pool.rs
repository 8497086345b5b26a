//! In-memory index of every clip on disk, grouped by category.
//!
//! Layout under each sound root:
//!
//! ```text
//! <category>/*.mp3|wav|ogg              base pool
//! <category>/<season-or-holiday>/*      themed pools
//! <category>/tags/<tag>/*               tag override pools
//! ten/...                               older name of interval/
//! holidays/<holiday>/common/*           holiday clips usable for any category
//! holidays/<holiday>/greeting/*         played once when the session opens
//! ```
//!
//! The set is always rebuilt from a full scan, never patched.

use crate::core::calendar::CalendarConfig;
use crate::core::environment::Environment;
use crate::models::category::Category;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const CLIP_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];
const LEGACY_INTERVAL_DIR: &str = "ten";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPool {
    pub base: Vec<PathBuf>,
    pub seasons: BTreeMap<String, Vec<PathBuf>>,
    pub holidays: BTreeMap<String, Vec<PathBuf>>,
    pub tags: BTreeMap<String, Vec<PathBuf>>,
}

impl CategoryPool {
    pub fn len(&self) -> usize {
        self.base.len()
            + [&self.seasons, &self.holidays, &self.tags]
                .iter()
                .flat_map(|m| m.values())
                .map(Vec::len)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundPoolSet {
    pools: BTreeMap<Category, CategoryPool>,
    holiday_common: BTreeMap<String, Vec<PathBuf>>,
    holiday_greeting: BTreeMap<String, Vec<PathBuf>>,
}

impl SoundPoolSet {
    /// Scan the local, parallel and cloud sound roots.
    pub fn build(env: &Environment, calendar: &CalendarConfig) -> Self {
        let set = Self::scan(&sound_roots(env), &calendar.holiday_ids());
        debug!(clips = set.total_clips(), "sound pools rebuilt");
        set
    }

    /// Scan `roots` in order; folder names listed in `holiday_ids` are filed
    /// as holiday pools, every other sub-folder as a season pool.
    pub fn scan(roots: &[PathBuf], holiday_ids: &[String]) -> Self {
        let mut set = Self::default();
        for root in roots.iter().filter(|r| r.is_dir()) {
            for cat in Category::ALL {
                set.scan_category(&root.join(cat.as_str()), cat, holiday_ids);
            }
            set.scan_category(&root.join(LEGACY_INTERVAL_DIR), Category::Interval, holiday_ids);
            set.scan_holidays(&root.join("holidays"));
        }
        set
    }

    fn scan_category(&mut self, dir: &Path, cat: Category, holiday_ids: &[String]) {
        if !dir.is_dir() {
            return;
        }
        let pool = self.pools.entry(cat).or_default();
        pool.base.extend(clips_in(dir));

        for (name, sub) in subdirs(dir) {
            if name == "tags" {
                for (tag, tag_dir) in subdirs(&sub) {
                    pool.tags.entry(tag).or_default().extend(clips_in(&tag_dir));
                }
            } else if holiday_ids.contains(&name) {
                pool.holidays.entry(name).or_default().extend(clips_in(&sub));
            } else {
                pool.seasons.entry(name).or_default().extend(clips_in(&sub));
            }
        }
    }

    fn scan_holidays(&mut self, dir: &Path) {
        for (id, holiday_dir) in subdirs(dir) {
            // loose files count as common
            let loose = clips_in(&holiday_dir);
            if !loose.is_empty() {
                self.holiday_common.entry(id.clone()).or_default().extend(loose);
            }
            for (kind, kind_dir) in subdirs(&holiday_dir) {
                let target = match kind.as_str() {
                    "greeting" => &mut self.holiday_greeting,
                    _ => &mut self.holiday_common,
                };
                target.entry(id.clone()).or_default().extend(clips_in(&kind_dir));
            }
        }
    }

    pub fn pool(&self, cat: Category) -> Option<&CategoryPool> {
        self.pools.get(&cat)
    }

    /// Holiday clips for `cat` across all `active` holidays, including each
    /// holiday's category-independent `common` clips.
    pub fn holiday_clips(&self, cat: Category, active: &[String]) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for id in active {
            if let Some(clips) = self.pool(cat).and_then(|p| p.holidays.get(id)) {
                out.extend(clips.iter().cloned());
            }
            if let Some(clips) = self.holiday_common.get(id) {
                out.extend(clips.iter().cloned());
            }
        }
        out
    }

    pub fn greeting_clips(&self, active: &[String]) -> Vec<PathBuf> {
        active
            .iter()
            .filter_map(|id| self.holiday_greeting.get(id))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn total_clips(&self) -> usize {
        self.pools.values().map(CategoryPool::len).sum::<usize>()
            + self
                .holiday_common
                .values()
                .chain(self.holiday_greeting.values())
                .map(Vec::len)
                .sum::<usize>()
    }
}

/// Roots scanned for clips, local first. `sounds/random` is the older layout.
pub fn sound_roots(env: &Environment) -> Vec<PathBuf> {
    let mut roots = vec![env.sounds_dir(), env.sounds_dir().join("random")];
    if let Some(parallel) = env.parallel_sounds_dir() {
        roots.push(parallel.join("random"));
        roots.push(parallel);
    }
    roots.push(env.cloud_dir());
    roots
}

pub fn is_clip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CLIP_EXTENSIONS.iter().any(|c| e.eq_ignore_ascii_case(c)))
}

/// Clip files directly inside `dir`, sorted for stable output.
pub fn clips_in(dir: &Path) -> Vec<PathBuf> {
    let mut clips: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_clip(e.path()))
        .map(|e| e.into_path())
        .collect();
    clips.sort();
    clips
}

/// Immediate sub-directories of `dir` as (lowercased name, path).
fn subdirs(dir: &Path) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| (e.file_name().to_string_lossy().to_lowercase(), e.into_path()))
        .collect()
}
