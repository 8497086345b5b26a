//! Pointer gestures over the pet window.
//!
//! Widgets forward raw input here; one coordinator owns the gesture state so
//! dragging the window and dragging the time display can never overlap.
//!
//! - Shift + left drag anywhere moves the window.
//! - Left drag on the time display, while idle or paused, adjusts a duration
//!   (Alt: rest, else work): horizontal distance changes seconds, vertical
//!   distance changes minutes.
//! - Double-click applies a preset chosen by vertical quarter.
//! - Right click opens the menu.

use crate::core::timer::{PresetOutcome, TimerState};
use crate::models::phase::EditTarget;

const DEADZONE_SECONDS_PX: f64 = 20.0;
const DEADZONE_MINUTES_PX: f64 = 10.0;
const PX_PER_SECOND_STEP: f64 = 40.0;
const PX_PER_MINUTE_STEP: f64 = 60.0;
/// Step counts beyond this are meaningless once the duration is clamped.
const MAX_STEPS: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press {
        button: Button,
        /// Global pointer position.
        x: f64,
        y: f64,
        modifiers: Modifiers,
        /// Current window origin.
        window: (i32, i32),
        on_time_display: bool,
    },
    Move {
        x: f64,
        y: f64,
    },
    Release,
    DoubleClick {
        button: Button,
        /// Pointer y relative to the window, and the window height.
        y: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    MoveWindow { x: i32, y: i32 },
    /// Window drag finished; position should be persisted.
    WindowPlaced,
    OpenMenu { x: i32, y: i32 },
    DurationChanged { target: EditTarget, secs: u32 },
    /// Adjust gesture ended; settings should be saved.
    AdjustFinished { target: EditTarget },
    Preset(PresetOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingWindow {
        offset_x: f64,
        offset_y: f64,
    },
    AdjustingDuration {
        target: EditTarget,
        start_x: f64,
        start_y: f64,
        start_secs: u32,
    },
}

#[derive(Debug, Default)]
pub struct InteractionCoordinator {
    gesture: Gesture,
}

impl InteractionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn handle(&mut self, event: PointerEvent, timer: &mut TimerState) -> Action {
        match event {
            PointerEvent::Press {
                button: Button::Right,
                x,
                y,
                ..
            } => Action::OpenMenu {
                x: x.round() as i32,
                y: y.round() as i32,
            },
            PointerEvent::Press {
                button: Button::Left,
                x,
                y,
                modifiers,
                window,
                on_time_display,
            } => {
                if modifiers.shift {
                    self.gesture = Gesture::DraggingWindow {
                        offset_x: x - f64::from(window.0),
                        offset_y: y - f64::from(window.1),
                    };
                } else if on_time_display && timer.phase().is_editable() {
                    let target = if modifiers.alt {
                        EditTarget::Rest
                    } else {
                        EditTarget::Work
                    };
                    self.gesture = Gesture::AdjustingDuration {
                        target,
                        start_x: x,
                        start_y: y,
                        start_secs: timer.duration(target),
                    };
                }
                Action::None
            }
            PointerEvent::Press { .. } => Action::None,
            PointerEvent::Move { x, y } => match self.gesture {
                Gesture::Idle => Action::None,
                Gesture::DraggingWindow { offset_x, offset_y } => Action::MoveWindow {
                    x: (x - offset_x).round() as i32,
                    y: (y - offset_y).round() as i32,
                },
                Gesture::AdjustingDuration {
                    target,
                    start_x,
                    start_y,
                    start_secs,
                } => {
                    let raw = adjusted_duration(start_secs, x - start_x, start_y - y);
                    let before = timer.duration(target);
                    let secs = timer.set_duration(target, raw);
                    if secs == before {
                        Action::None
                    } else {
                        Action::DurationChanged { target, secs }
                    }
                }
            },
            PointerEvent::Release => match std::mem::take(&mut self.gesture) {
                Gesture::Idle => Action::None,
                Gesture::DraggingWindow { .. } => Action::WindowPlaced,
                Gesture::AdjustingDuration { target, .. } => Action::AdjustFinished { target },
            },
            PointerEvent::DoubleClick {
                button: Button::Left,
                y,
                height,
            } => Action::Preset(timer.apply_preset(quarter_of(y, height))),
            PointerEvent::DoubleClick { .. } => Action::None,
        }
    }
}

/// Duration after dragging `dx` px right and `dy` px up from `start_secs`.
///
/// Small movements inside the dead zones change nothing, and seconds are
/// ignored while the gesture is mostly vertical.
pub fn adjusted_duration(start_secs: u32, dx: f64, dy: f64) -> i64 {
    let eff_x = (dx.abs() - DEADZONE_SECONDS_PX).max(0.0);
    let eff_y = (dy.abs() - DEADZONE_MINUTES_PX).max(0.0);

    let sec_delta = if eff_x < eff_y * 0.75 {
        0
    } else {
        let steps = curve_steps(eff_x / PX_PER_SECOND_STEP, 1.2);
        if dx > 0.0 { steps } else { -steps }
    };
    let min_steps = curve_steps(eff_y / PX_PER_MINUTE_STEP, 1.1);
    let min_delta = if dy > 0.0 { min_steps } else { -min_steps };

    i64::from(start_secs)
        .saturating_add(min_delta.saturating_mul(60))
        .saturating_add(sec_delta)
}

fn curve_steps(units: f64, exponent: f64) -> i64 {
    units.powf(exponent).min(MAX_STEPS) as i64
}

/// Vertical quarter (0..=3) of `y` within `height`.
pub fn quarter_of(y: f64, height: f64) -> usize {
    if height <= 0.0 {
        return 0;
    }
    ((y / height) * 4.0).clamp(0.0, 3.0) as usize
}
