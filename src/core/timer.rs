//! Phase state machine: idle → working ⇄ resting, with pause/resume.
//!
//! All mutation happens on the session thread. Every operation returns the
//! events it produced; the caller turns cues into sounds and decides whether
//! to save settings or exit.

use crate::config::{Settings, clamp_rest, clamp_work};
use crate::models::category::Category;
use crate::models::phase::{ActivePhase, EditTarget, Phase};
use crate::utils::time::{format_mmss, minutes_to_secs};
use serde::Serialize;

/// Working time after which `/surrender` is accepted.
pub const SURRENDER_AFTER_SECS: u32 = 15 * 60;

/// Values walked by the interval toggle; 0 disables interval voice.
pub const INTERVAL_CYCLE: [u32; 4] = [10, 15, 30, 0];

const WORK_PRESETS_MIN: [u32; 4] = [15, 30, 40, 60];
const REST_PRESETS_MIN: [u32; 3] = [5, 10, 15];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerEvent {
    Started,
    Paused,
    Resumed,
    WorkEnded,
    RestEnded,
    IntervalReached,
    /// Work ended with `exit_on_work_end` set; the application must terminate.
    ExitRequested,
    Reset,
}

impl TimerEvent {
    /// Sound category announced by this event, if any.
    pub fn cue(&self) -> Option<Category> {
        match self {
            TimerEvent::Started | TimerEvent::RestEnded => Some(Category::Start),
            TimerEvent::Resumed => Some(Category::Resume),
            TimerEvent::WorkEnded => Some(Category::End),
            TimerEvent::IntervalReached => Some(Category::Interval),
            TimerEvent::Paused | TimerEvent::ExitRequested | TimerEvent::Reset => None,
        }
    }
}

/// Result of a double-click preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOutcome {
    /// Not allowed while counting.
    Ignored,
    WorkSet(u32),
    RestSet(u32),
    ExitOnWorkEndToggled(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerState {
    phase: Phase,
    elapsed: u32,
    work_duration: u32,
    rest_duration: u32,
    exit_on_work_end: bool,
    interval_minutes: u32,
    interval_enabled: bool,
    edit_target: EditTarget,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), true)
    }
}

impl TimerState {
    pub fn from_settings(settings: &Settings, interval_enabled: bool) -> Self {
        Self {
            phase: Phase::Idle,
            elapsed: 0,
            work_duration: clamp_work(settings.work_duration),
            rest_duration: clamp_rest(settings.rest_duration),
            exit_on_work_end: settings.exit_on_work_end,
            interval_minutes: settings.voice_interval_minutes,
            interval_enabled,
            edit_target: EditTarget::Work,
        }
    }

    /// Copy the persisted fields back into `settings`.
    pub fn store(&self, settings: &mut Settings) {
        settings.work_duration = self.work_duration;
        settings.rest_duration = self.rest_duration;
        settings.exit_on_work_end = self.exit_on_work_end;
        settings.voice_interval_minutes = self.interval_minutes;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn work_duration(&self) -> u32 {
        self.work_duration
    }

    pub fn rest_duration(&self) -> u32 {
        self.rest_duration
    }

    pub fn exit_on_work_end(&self) -> bool {
        self.exit_on_work_end
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn edit_target(&self) -> EditTarget {
        self.edit_target
    }

    fn duration_of(&self, phase: ActivePhase) -> u32 {
        match phase {
            ActivePhase::Working => self.work_duration,
            ActivePhase::Resting => self.rest_duration,
        }
    }

    /// Seconds left in the counting (or suspended) phase.
    pub fn remaining(&self) -> Option<u32> {
        let phase = match self.phase {
            Phase::Paused { suspended } => suspended,
            other => other.active()?,
        };
        Some(self.duration_of(phase).saturating_sub(self.elapsed))
    }

    // ---------------------------
    // User actions
    // ---------------------------

    /// Start from idle, or resume when paused.
    pub fn start(&mut self) -> Vec<TimerEvent> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Working;
                self.elapsed = 0;
                vec![TimerEvent::Started]
            }
            Phase::Paused { .. } => self.resume(),
            Phase::Working | Phase::Resting => Vec::new(),
        }
    }

    pub fn pause(&mut self) -> Vec<TimerEvent> {
        match self.phase.active() {
            Some(suspended) => {
                self.phase = Phase::Paused { suspended };
                vec![TimerEvent::Paused]
            }
            None => Vec::new(),
        }
    }

    pub fn resume(&mut self) -> Vec<TimerEvent> {
        match self.phase {
            Phase::Paused { suspended } => {
                self.phase = suspended.into();
                vec![TimerEvent::Resumed]
            }
            _ => Vec::new(),
        }
    }

    /// The single start/pause/resume key.
    pub fn toggle(&mut self) -> Vec<TimerEvent> {
        match self.phase {
            Phase::Working | Phase::Resting => self.pause(),
            Phase::Idle | Phase::Paused { .. } => self.start(),
        }
    }

    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.phase = Phase::Idle;
        self.elapsed = 0;
        self.edit_target = EditTarget::Work;
        vec![TimerEvent::Reset]
    }

    /// Giving up is only accepted after a meaningful amount of work.
    pub fn can_surrender(&self) -> bool {
        self.phase == Phase::Working && self.elapsed > SURRENDER_AFTER_SECS
    }

    // ---------------------------
    // Tick
    // ---------------------------

    /// One second passed. No-op unless working or resting.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let Some(active) = self.phase.active() else {
            return Vec::new();
        };

        self.elapsed += 1;
        let mut events = Vec::new();
        if self.maybe_interval_voice() {
            events.push(TimerEvent::IntervalReached);
        }

        if self.elapsed < self.duration_of(active) {
            return events;
        }

        match active {
            ActivePhase::Working => {
                events.push(TimerEvent::WorkEnded);
                if self.exit_on_work_end {
                    events.push(TimerEvent::ExitRequested);
                    return events;
                }
                self.phase = Phase::Resting;
            }
            ActivePhase::Resting => {
                events.push(TimerEvent::RestEnded);
                self.phase = Phase::Working;
            }
        }
        self.elapsed = 0;
        events
    }

    /// Interval voice fires on exact multiples of the interval while working.
    pub fn maybe_interval_voice(&self) -> bool {
        let period = minutes_to_secs(self.interval_minutes);
        self.interval_enabled
            && period > 0
            && self.phase == Phase::Working
            && self.elapsed > 0
            && self.elapsed % period == 0
    }

    // ---------------------------
    // Editing
    // ---------------------------

    pub fn set_work_duration(&mut self, raw_secs: i64) -> u32 {
        self.work_duration = clamp_work(saturate(raw_secs));
        self.work_duration
    }

    pub fn set_rest_duration(&mut self, raw_secs: i64) -> u32 {
        self.rest_duration = clamp_rest(saturate(raw_secs));
        self.rest_duration
    }

    pub fn set_duration(&mut self, target: EditTarget, raw_secs: i64) -> u32 {
        match target {
            EditTarget::Work => self.set_work_duration(raw_secs),
            EditTarget::Rest => self.set_rest_duration(raw_secs),
        }
    }

    pub fn duration(&self, target: EditTarget) -> u32 {
        match target {
            EditTarget::Work => self.work_duration,
            EditTarget::Rest => self.rest_duration,
        }
    }

    /// Switch which duration presets and adjustments edit. Returns false while counting.
    pub fn toggle_edit_target(&mut self) -> bool {
        if !self.phase.is_editable() {
            return false;
        }
        self.edit_target = self.edit_target.toggled();
        true
    }

    /// Double-click preset by vertical quarter (0 = top). For the rest target
    /// the bottom quarter toggles `exit_on_work_end` instead.
    pub fn apply_preset(&mut self, quarter: usize) -> PresetOutcome {
        if !self.phase.is_editable() {
            return PresetOutcome::Ignored;
        }
        let quarter = quarter.min(3);
        match self.edit_target {
            EditTarget::Work => {
                let secs = minutes_to_secs(WORK_PRESETS_MIN[quarter]);
                PresetOutcome::WorkSet(self.set_work_duration(secs.into()))
            }
            EditTarget::Rest => match REST_PRESETS_MIN.get(quarter) {
                Some(&minutes) => {
                    self.exit_on_work_end = false;
                    PresetOutcome::RestSet(self.set_rest_duration(minutes_to_secs(minutes).into()))
                }
                None => PresetOutcome::ExitOnWorkEndToggled(self.toggle_exit_on_work_end()),
            },
        }
    }

    pub fn toggle_exit_on_work_end(&mut self) -> bool {
        self.exit_on_work_end = !self.exit_on_work_end;
        self.exit_on_work_end
    }

    /// Step through 10 → 15 → 30 → off → 10 minutes.
    pub fn cycle_voice_interval(&mut self) -> u32 {
        let next = INTERVAL_CYCLE
            .iter()
            .position(|&m| m == self.interval_minutes)
            .map(|i| INTERVAL_CYCLE[(i + 1) % INTERVAL_CYCLE.len()])
            .unwrap_or(INTERVAL_CYCLE[0]);
        self.interval_minutes = next;
        next
    }

    pub fn set_voice_interval(&mut self, minutes: u32) {
        self.interval_minutes = minutes;
    }

    // ---------------------------
    // Display
    // ---------------------------

    /// Text of the time display: the edited duration while idle, elapsed time otherwise.
    pub fn display_text(&self) -> String {
        match self.phase {
            Phase::Idle => match self.edit_target {
                EditTarget::Rest if self.exit_on_work_end => "INF".to_string(),
                target => format_mmss(self.duration(target)),
            },
            _ => format_mmss(self.elapsed),
        }
    }
}

fn saturate(raw: i64) -> u32 {
    raw.clamp(0, u32::MAX as i64) as u32
}
