//! Logical asset names to file paths.
//!
//! Lookup order for `<subfolder>/<name>`:
//!  1. `<base>/<subfolder>/<name>` (user override beside the executable)
//!  2. `<base>/../<subfolder>/<name>` (shared assets layout)
//!  3. `<bundle>/<subfolder>/<name>` (installed with the application)
//!
//! When nothing exists the override path is returned anyway; callers treat a
//! missing file as "use the placeholder" or "stay silent".

use crate::core::environment::Environment;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AssetResolver {
    base: PathBuf,
    parallel: Option<PathBuf>,
    bundle: Option<PathBuf>,
}

impl AssetResolver {
    pub fn new(env: &Environment) -> Self {
        Self {
            base: env.base_dir.clone(),
            parallel: env.parallel_root.clone(),
            bundle: env.bundle_dir.clone(),
        }
    }

    pub fn resolve_in(&self, subfolder: &str, name: &str) -> PathBuf {
        let local = self.base.join(subfolder).join(name);
        if local.exists() {
            return local;
        }
        let candidates = [self.parallel.as_deref(), self.bundle.as_deref()];
        candidates
            .into_iter()
            .flatten()
            .map(|root| root.join(subfolder).join(name))
            .find(|p| p.exists())
            .unwrap_or(local)
    }

    /// Image or other visual under `assets/`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.resolve_in("assets", name)
    }

    /// Fixed clip under `sounds/` (e.g. the per-category default file).
    pub fn sound(&self, name: &str) -> PathBuf {
        self.resolve_in("sounds", name)
    }

    /// Window icon: first holiday icon, then first season icon, then the
    /// generic icon names.
    pub fn season_icon(&self, holidays: &[String], seasons: &[String]) -> Option<PathBuf> {
        let themed = holidays.iter().chain(seasons.iter()).find_map(|id| {
            [format!("icons/{id}.png"), format!("icon_{id}.png")]
                .iter()
                .map(|name| self.resolve(name))
                .find(|p| p.exists())
        });
        themed.or_else(|| {
            ["icons/default.png", "icons/icon.png", "icon.png"]
                .iter()
                .map(|name| self.resolve(name))
                .find(|p| p.exists())
        })
    }

    /// Animation frames for `name`: every PNG in the `name/` folder sorted by
    /// numeric suffix, or the single `name.png`, or nothing.
    pub fn frames(&self, name: &str) -> Vec<PathBuf> {
        let folder = self.resolve(name);
        if folder.is_dir() {
            let mut frames = png_files(&folder);
            if !frames.is_empty() {
                frames.sort_by_key(|p| frame_key(p));
                return frames;
            }
        }
        let single = self.resolve(&format!("{name}.png"));
        if single.exists() { vec![single] } else { Vec::new() }
    }
}

fn png_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect()
}

/// Sort frames by trailing number (`idle_2` before `idle_10`), then by name.
fn frame_key(path: &Path) -> (u64, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    (digits.parse().unwrap_or(u64::MAX), stem)
}
