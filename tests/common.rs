#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use pomodoro_pet::core::environment::Environment;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn pomo() -> Command {
    cargo_bin_cmd!("pomodoro-pet")
}

/// Scratch tree with the application living in `<tmp>/app`, so that `<tmp>`
/// plays the role of the parallel (shared assets) directory.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("app")).expect("create app dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn base(&self) -> PathBuf {
        self.dir.path().join("app")
    }

    pub fn env(&self) -> Environment {
        Environment::for_base(self.base())
    }

    /// Environment with the given `POMODORO_*` variables set.
    pub fn env_with(&self, vars: &[(&str, &str)]) -> Environment {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::from_lookup(self.base(), None, move |key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    /// Create a non-empty file at `<base>/<rel>`.
    pub fn touch(&self, rel: &str) -> PathBuf {
        touch(&self.base().join(rel))
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.base().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write file");
        path
    }
}

pub fn touch(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"RIFF").expect("write file");
    path.to_path_buf()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
