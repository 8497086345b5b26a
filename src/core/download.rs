//! Background sound update, run once per start when update checks are on.
//!
//! The source URL comes from `POMODORO_SOUNDS_URL` or `sounds_update_url`:
//!  - `*.git`  → clone or pull the repository into `sounds/cloud`
//!  - `*.json` → fetch that manifest
//!  - other    → fetch `<url>/manifest.json`
//!
//! A manifest failure aborts the pass (the next start retries); a failing
//! file is logged and skipped. Completion is always reported, success or not,
//! so the caller can rebuild its pools only after nothing is writing anymore.

use crate::config::Settings;
use crate::core::environment::Environment;
use crate::errors::{AppError, AppResult};
use crate::models::manifest::{Manifest, ManifestEntry};
use reqwest::blocking::Client;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("pomodoro-pet/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Whole-request limit for the manifest document.
pub const MANIFEST_TIMEOUT: Duration = Duration::from_secs(8);
/// Whole-request limit for one clip, body included.
pub const FILE_TIMEOUT: Duration = Duration::from_secs(30);
/// git aborts a transfer slower than this many bytes/s for GIT_LOW_SPEED_SECS.
const GIT_LOW_SPEED_LIMIT: &str = "1000";
const GIT_LOW_SPEED_SECS: &str = "8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    Git(String),
    Manifest(String),
}

impl SoundSource {
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        let trimmed = url.trim_end_matches('/');
        if trimmed.to_lowercase().ends_with(".git") {
            Some(SoundSource::Git(trimmed.to_string()))
        } else if trimmed.to_lowercase().ends_with(".json") {
            Some(SoundSource::Manifest(trimmed.to_string()))
        } else {
            Some(SoundSource::Manifest(format!("{trimmed}/manifest.json")))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub invalid_entries: usize,
    /// Files re-deleted after a pull because the user had removed them.
    pub kept_deleted: usize,
    /// Why the pass stopped early, if it did.
    pub aborted: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadManager {
    cloud_dir: PathBuf,
    source: Option<SoundSource>,
    manifest_timeout: Duration,
    file_timeout: Duration,
}

impl DownloadManager {
    pub fn new(env: &Environment, settings: &Settings) -> Self {
        let url = env
            .sounds_url
            .clone()
            .unwrap_or_else(|| settings.sounds_update_url.clone());
        Self::with_source(env.cloud_dir(), SoundSource::from_url(&url))
    }

    pub fn with_source(cloud_dir: PathBuf, source: Option<SoundSource>) -> Self {
        Self {
            cloud_dir,
            source,
            manifest_timeout: MANIFEST_TIMEOUT,
            file_timeout: FILE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, manifest: Duration, file: Duration) -> Self {
        self.manifest_timeout = manifest;
        self.file_timeout = file;
        self
    }

    pub fn source(&self) -> Option<&SoundSource> {
        self.source.as_ref()
    }

    /// Run the pass on a worker thread and hand the report to `on_complete`
    /// from that thread once every write has finished.
    pub fn spawn<F>(self, on_complete: F) -> AppResult<JoinHandle<()>>
    where
        F: FnOnce(DownloadReport) + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("sound-update".into())
            .spawn(move || on_complete(self.run()))?;
        Ok(handle)
    }

    /// Run the whole pass on the calling thread.
    pub fn run(&self) -> DownloadReport {
        let mut report = DownloadReport::default();
        let result = match &self.source {
            None => {
                debug!("no sound update source configured");
                return report;
            }
            Some(SoundSource::Git(url)) => self.sync_git(url, &mut report),
            Some(SoundSource::Manifest(url)) => self.sync_manifest(url, &mut report),
        };
        if let Err(e) = result {
            warn!(error = %e, "sound update aborted");
            report.aborted = Some(e.to_string());
        }
        info!(
            downloaded = report.downloaded,
            skipped = report.skipped_existing,
            failed = report.failed,
            "sound update finished"
        );
        report
    }

    // ---------------------------
    // JSON manifest
    // ---------------------------

    fn sync_manifest(&self, url: &str, report: &mut DownloadReport) -> AppResult<()> {
        let client = http_client()?;
        info!(url, "fetching sound manifest");
        let text = client
            .get(url)
            .timeout(self.manifest_timeout)
            .send()?
            .error_for_status()?
            .text()?;
        let manifest = Manifest::parse(&text)?;
        report.invalid_entries = manifest.skipped;

        fs::create_dir_all(&self.cloud_dir)?;
        for entry in &manifest.entries {
            match self.fetch_entry(&client, entry) {
                Ok(true) => report.downloaded += 1,
                Ok(false) => report.skipped_existing += 1,
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "failed to download clip");
                    report.failed += 1;
                }
            }
        }
        Ok(())
    }

    /// Download one entry unless it is already present. Returns whether a file was written.
    fn fetch_entry(&self, client: &Client, entry: &ManifestEntry) -> AppResult<bool> {
        let dest = self.cloud_dir.join(entry.relative_path());
        if already_present(&dest) {
            return Ok(false);
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        debug!(url = %entry.url, dest = %dest.display(), "downloading");
        let bytes = client
            .get(&entry.url)
            .timeout(self.file_timeout)
            .send()?
            .error_for_status()?
            .bytes()?;
        let part = partial_path(&dest);
        fs::write(&part, &bytes)?;
        fs::rename(&part, &dest)?;
        Ok(true)
    }

    // ---------------------------
    // Git repository
    // ---------------------------

    fn sync_git(&self, url: &str, report: &mut DownloadReport) -> AppResult<()> {
        if !self.cloud_dir.join(".git").exists() {
            if dir_has_entries(&self.cloud_dir) {
                return Err(AppError::Git(format!(
                    "{} exists and is not a git checkout",
                    self.cloud_dir.display()
                )));
            }
            if let Some(parent) = self.cloud_dir.parent() {
                fs::create_dir_all(parent)?;
            }
            info!(url, "cloning sound repository");
            let target = self.cloud_dir.to_string_lossy().to_string();
            let parent = self.cloud_dir.parent().unwrap_or(Path::new("."));
            git(parent, &["clone", "--quiet", url, &target])?;
            return Ok(());
        }

        let dir = self.cloud_dir.as_path();
        let deleted = lines(&git(dir, &["ls-files", "--deleted"])?);
        let old = git(dir, &["rev-parse", "HEAD"])?.trim().to_string();
        git(dir, &["fetch", "--quiet", "origin"])?;
        let new = git(dir, &["rev-parse", "@{u}"])
            .or_else(|_| git(dir, &["rev-parse", "FETCH_HEAD"]))?
            .trim()
            .to_string();

        if old == new {
            debug!("sound repository already up to date");
            return Ok(());
        }

        let changed = lines(&git(dir, &["diff", "--name-only", &old, &new])?);
        git(dir, &["reset", "--quiet", "--hard", &new])?;
        report.downloaded = changed.len();

        for path in files_to_keep_deleted(&deleted, &changed) {
            let full = dir.join(&path);
            match fs::remove_file(&full) {
                Ok(()) => report.kept_deleted += 1,
                Err(e) => warn!(file = %full.display(), error = %e, "could not re-delete file"),
            }
        }
        info!(from = %old, to = %new, "sound repository updated");
        Ok(())
    }
}

/// Locally deleted files that upstream did not touch stay deleted after a pull.
pub fn files_to_keep_deleted(deleted: &[String], changed: &[String]) -> Vec<String> {
    let changed: HashSet<&str> = changed.iter().map(String::as_str).collect();
    deleted
        .iter()
        .filter(|p| !changed.contains(p.as_str()))
        .cloned()
        .collect()
}

/// A file that exists with non-zero size is never downloaded again.
pub fn already_present(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn http_client() -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}

fn git(dir: &Path, args: &[&str]) -> AppResult<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GIT_HTTP_LOW_SPEED_LIMIT", GIT_LOW_SPEED_LIMIT)
        .env("GIT_HTTP_LOW_SPEED_TIME", GIT_LOW_SPEED_SECS)
        .output()
        .map_err(|e| AppError::Git(format!("cannot run git: {e}")))?;
    if !output.status.success() {
        return Err(AppError::Git(format!(
            "git {} failed: {}",
            args.first().unwrap_or(&""),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|mut it| it.next().is_some())
}
