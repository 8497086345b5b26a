//! Audio output seam. Decoding and devices live behind `SoundSink`; the
//! session only starts clips and, on exit, waits a bounded time for the last one.

use crate::core::environment::Environment;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Clips remembered by `LogSink`.
pub const LOG_HISTORY: usize = 32;
const POLL: Duration = Duration::from_millis(50);

const MACOS_PLAYERS: &[&[&str]] = &[&["afplay"]];
const UNIX_PLAYERS: &[&[&str]] = &[
    &["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"],
    &["paplay"],
    &["aplay", "-q"],
];

pub trait SoundSink {
    /// Start playing `clip` without blocking. Clips queue behind the current one.
    fn play(&mut self, clip: &Path);

    /// Wait until playback finished or `timeout` elapsed. Returns true when
    /// playback finished in time.
    fn wait_idle(&mut self, timeout: Duration) -> bool;

    fn stop(&mut self);

    /// Advance the queue; called on every clock tick.
    fn poll(&mut self) {}
}

/// Reports clips through the log instead of a sound device.
#[derive(Debug, Default)]
pub struct LogSink {
    played: Vec<PathBuf>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent clips, oldest first, at most `LOG_HISTORY`.
    pub fn played(&self) -> &[PathBuf] {
        &self.played
    }
}

impl SoundSink for LogSink {
    fn play(&mut self, clip: &Path) {
        if clip.exists() {
            info!(clip = %clip.display(), "playing");
        } else {
            warn!(clip = %clip.display(), "clip missing, staying silent");
        }
        if self.played.len() == LOG_HISTORY {
            self.played.remove(0);
        }
        self.played.push(clip.to_path_buf());
    }

    fn wait_idle(&mut self, _timeout: Duration) -> bool {
        true
    }

    fn stop(&mut self) {}
}

/// Plays clips through an external command line player, one process per
/// clip, in order.
#[derive(Debug)]
pub struct ProcessSink {
    program: OsString,
    args: Vec<OsString>,
    queue: VecDeque<PathBuf>,
    current: Option<Child>,
}

impl ProcessSink {
    /// `program args.. <clip>` is run for each clip.
    pub fn new<I, A>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            queue: VecDeque::new(),
            current: None,
        }
    }

    /// Player from `POMODORO_PLAYER`, else the first known player on `PATH`.
    /// `None` when playback is switched off or nothing is installed.
    pub fn detect(env: &Environment) -> Option<Self> {
        if let Some(cmd) = &env.player {
            if matches!(cmd.to_lowercase().as_str(), "none" | "off" | "0") {
                return None;
            }
            let mut parts = cmd.split_whitespace();
            let program = parts.next()?;
            return Some(Self::new(program, parts));
        }

        let candidates: &[&[&str]] = if cfg!(target_os = "macos") {
            MACOS_PLAYERS
        } else if cfg!(unix) {
            UNIX_PLAYERS
        } else {
            &[]
        };
        candidates
            .iter()
            .find(|c| on_path(c[0]))
            .map(|c| Self::new(c[0], &c[1..]))
    }

    pub fn is_busy(&mut self) -> bool {
        self.advance();
        self.current.is_some()
    }

    /// Reap a finished player and start the next queued clip.
    fn advance(&mut self) {
        if let Some(child) = &mut self.current {
            match child.try_wait() {
                Ok(None) => return,
                Ok(Some(status)) => {
                    if !status.success() {
                        debug!(%status, "player exited with failure");
                    }
                }
                Err(e) => warn!(error = %e, "lost track of player process"),
            }
            self.current = None;
        }

        while let Some(clip) = self.queue.pop_front() {
            let spawned = Command::new(&self.program)
                .args(&self.args)
                .arg(&clip)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(child) => {
                    info!(clip = %clip.display(), "playing");
                    self.current = Some(child);
                    return;
                }
                Err(e) => {
                    warn!(
                        player = %self.program.to_string_lossy(),
                        error = %e,
                        "could not start player"
                    );
                }
            }
        }
    }
}

impl SoundSink for ProcessSink {
    fn play(&mut self, clip: &Path) {
        if !clip.exists() {
            warn!(clip = %clip.display(), "clip missing, staying silent");
            return;
        }
        self.queue.push_back(clip.to_path_buf());
        self.advance();
    }

    fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_busy() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep(POLL.min(deadline - now));
        }
    }

    fn stop(&mut self) {
        self.queue.clear();
        if let Some(mut child) = self.current.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn poll(&mut self) {
        self.advance();
    }
}

impl Drop for ProcessSink {
    fn drop(&mut self) {
        self.stop();
    }
}

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
