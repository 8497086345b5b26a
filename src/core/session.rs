//! The running pet: one owner of timer, settings and sound state.
//!
//! Everything that mutates session state arrives as a `SessionEvent` on a
//! single channel (clock ticks, console commands, pointer gestures, the
//! download worker). The owner thread handles them one at a time, so no
//! state is ever shared between threads.

use crate::config::Settings;
use crate::core::assets::AssetResolver;
use crate::core::calendar::CalendarConfig;
use crate::core::download::{DownloadManager, DownloadReport};
use crate::core::environment::Environment;
use crate::core::interaction::{Action, Button, InteractionCoordinator, Modifiers, PointerEvent};
use crate::core::player::SoundSink;
use crate::core::sound_pool::SoundPoolSet;
use crate::core::sound_select::SoundSelector;
use crate::core::timer::{PresetOutcome, TimerEvent, TimerState};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::phase::EditTarget;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::{parse_mmdd, today};
use chrono::NaiveDate;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info as log_info, warn};

/// Upper bound on waiting for the exit clip before the process ends.
pub const EXIT_SOUND_WAIT: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Toggle,
    ToggleEditTarget,
    /// Minutes added to the edit target (negative shortens it).
    Adjust(i64),
    /// Preset by quarter, 0 = top.
    Preset(usize),
    CycleInterval,
    ToggleExitVoice,
    ToggleExitOnWorkEnd,
    ToggleAlwaysOnTop,
    ToggleUpdateChecks,
    Remake,
    Surrender,
    Birthday(String),
    /// Drag on the time display by `dx` px right and `dy` px up.
    Drag { dx: f64, dy: f64 },
    /// Double-click in a quarter of the pet, 0 = top.
    DoubleClick(usize),
    /// Shift-drag the window to a screen position.
    MoveWindow { x: i32, y: i32 },
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `None`, except a lone space
    /// which toggles the timer.
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let raw = line.trim_end_matches(['\r', '\n']);
        let cmd = raw.trim();
        if cmd.is_empty() {
            return Ok(raw.contains(' ').then_some(ConsoleCommand::Toggle));
        }

        if let Some(rest) = cmd.strip_prefix("/bir") {
            let value = rest.trim();
            if parse_mmdd(value).is_none() {
                return Err(AppError::InvalidBirthday(value.to_string()));
            }
            return Ok(Some(ConsoleCommand::Birthday(value.to_string())));
        }

        let mut words = cmd.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();
        let invalid = || AppError::InvalidCommand(cmd.to_string());
        match (verb.as_str(), args.as_slice()) {
            ("drag", [dx, dy]) => {
                let dx = dx.parse::<f64>().map_err(|_| invalid())?;
                let dy = dy.parse::<f64>().map_err(|_| invalid())?;
                return Ok(Some(ConsoleCommand::Drag { dx, dy }));
            }
            ("dbl", [quarter]) => {
                return match quarter.parse::<usize>() {
                    Ok(q @ 1..=4) => Ok(Some(ConsoleCommand::DoubleClick(q - 1))),
                    _ => Err(invalid()),
                };
            }
            ("move", [x, y]) => {
                let x = x.parse::<i32>().map_err(|_| invalid())?;
                let y = y.parse::<i32>().map_err(|_| invalid())?;
                return Ok(Some(ConsoleCommand::MoveWindow { x, y }));
            }
            ("drag" | "dbl" | "move", _) => return Err(invalid()),
            _ => {}
        }

        let parsed = match cmd.to_lowercase().as_str() {
            "s" | "space" => ConsoleCommand::Toggle,
            "t" => ConsoleCommand::ToggleEditTarget,
            "+" => ConsoleCommand::Adjust(1),
            "-" => ConsoleCommand::Adjust(-1),
            "p1" => ConsoleCommand::Preset(0),
            "p2" => ConsoleCommand::Preset(1),
            "p3" => ConsoleCommand::Preset(2),
            "p4" => ConsoleCommand::Preset(3),
            "i" => ConsoleCommand::CycleInterval,
            "e" => ConsoleCommand::ToggleExitVoice,
            "x" => ConsoleCommand::ToggleExitOnWorkEnd,
            "a" => ConsoleCommand::ToggleAlwaysOnTop,
            "u" => ConsoleCommand::ToggleUpdateChecks,
            "/remake" => ConsoleCommand::Remake,
            "/surrender" => ConsoleCommand::Surrender,
            "?" | "h" | "help" => ConsoleCommand::Help,
            "status" | "." => ConsoleCommand::Status,
            "q" | "quit" => ConsoleCommand::Quit,
            other => return Err(AppError::InvalidCommand(other.to_string())),
        };
        Ok(Some(parsed))
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    Tick,
    Command(ConsoleCommand),
    Pointer(PointerEvent),
    SoundsUpdated(DownloadReport),
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct Session<S: SoundSink> {
    env: Environment,
    settings: Settings,
    timer: TimerState,
    selector: SoundSelector,
    pools: SoundPoolSet,
    assets: AssetResolver,
    interaction: InteractionCoordinator,
    sink: S,
    clock: fn() -> NaiveDate,
    finished: bool,
}

impl<S: SoundSink> Session<S> {
    /// Load settings, calendar and pools for `env`.
    pub fn new(env: Environment, sink: S) -> Self {
        let settings = Settings::load(&env.base_dir);
        let calendar = CalendarConfig::load(&env.calendar_file());
        let pools = SoundPoolSet::build(&env, &calendar);
        let timer = TimerState::from_settings(&settings, env.interval_voice_enabled);
        let selector = SoundSelector::new(&env, calendar, settings.birthday.clone());
        let assets = AssetResolver::new(&env);
        debug!(clips = pools.total_clips(), "sound pools ready");

        Self {
            env,
            settings,
            timer,
            selector,
            pools,
            assets,
            interaction: InteractionCoordinator::new(),
            sink,
            clock: today,
            finished: false,
        }
    }

    /// Fixed clock and random seed, for reproducible runs.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.selector = self.selector.with_seed(seed);
        self
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pools(&self) -> &SoundPoolSet {
        &self.pools
    }

    /// Run until quit, surrender, end of input or exit-on-work-end.
    pub fn run(mut self) -> AppResult<()> {
        let (tx, rx) = mpsc::channel();

        self.greet();
        spawn_ticker(tx.clone())?;
        spawn_input(tx.clone())?;
        if self.settings.check_updates_enabled {
            let manager = DownloadManager::new(&self.env, &self.settings);
            if manager.source().is_some() {
                let tx = tx.clone();
                manager.spawn(move |report| {
                    let _ = tx.send(SessionEvent::SoundsUpdated(report));
                })?;
            }
        }
        drop(tx);

        for event in rx {
            if self.handle_event(event) == Control::Quit {
                break;
            }
        }
        self.shutdown();
        Ok(())
    }

    /// Play a holiday greeting if one is active today.
    pub fn greet(&mut self) {
        let date = (self.clock)();
        if let Some(clip) = self.selector.greeting(&self.pools, date) {
            self.sink.play(&clip);
        }
        let holidays = self.selector.active_holidays(date);
        if !holidays.is_empty() {
            info(format!("Today: {}", holidays.join(", ")));
        }
        self.print_status();
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> Control {
        match event {
            SessionEvent::Tick => {
                self.sink.poll();
                let events = self.timer.tick();
                self.apply_timer_events(&events)
            }
            SessionEvent::Command(cmd) => self.handle_command(cmd),
            SessionEvent::Pointer(ev) => {
                self.pointer(ev);
                Control::Continue
            }
            SessionEvent::SoundsUpdated(report) => {
                self.on_sounds_updated(&report);
                Control::Continue
            }
            SessionEvent::InputClosed => {
                debug!("console input closed");
                Control::Quit
            }
        }
    }

    pub fn handle_command(&mut self, cmd: ConsoleCommand) -> Control {
        match cmd {
            ConsoleCommand::Toggle => {
                let events = self.timer.toggle();
                return self.apply_timer_events(&events);
            }
            ConsoleCommand::ToggleEditTarget => {
                if self.timer.toggle_edit_target() {
                    info(format!("Editing {}", target_name(self.timer.edit_target())));
                } else {
                    warning("Durations can only be edited while idle or paused");
                }
            }
            ConsoleCommand::Adjust(minutes) => {
                if !self.timer.phase().is_editable() {
                    warning("Durations can only be edited while idle or paused");
                    return Control::Continue;
                }
                let target = self.timer.edit_target();
                let raw = i64::from(self.timer.duration(target)) + minutes * 60;
                self.timer.set_duration(target, raw);
                self.persist();
                info(format!(
                    "{} duration: {}",
                    target_name(target),
                    self.timer.display_text()
                ));
            }
            ConsoleCommand::Preset(quarter) => match self.timer.apply_preset(quarter) {
                PresetOutcome::Ignored => {
                    warning("Presets can only be applied while idle or paused")
                }
                outcome => {
                    self.persist();
                    report_preset(outcome);
                }
            },
            ConsoleCommand::CycleInterval => {
                let minutes = self.timer.cycle_voice_interval();
                self.persist();
                if minutes == 0 {
                    info("Interval voice off");
                } else {
                    info(format!("Interval voice every {minutes} min"));
                }
            }
            ConsoleCommand::ToggleExitVoice => {
                self.settings.exit_voice_enabled = !self.settings.exit_voice_enabled;
                self.persist();
                info(format!("Exit voice: {}", on_off(self.settings.exit_voice_enabled)));
            }
            ConsoleCommand::ToggleExitOnWorkEnd => {
                let on = self.timer.toggle_exit_on_work_end();
                self.persist();
                info(format!("Exit when work ends: {}", on_off(on)));
            }
            ConsoleCommand::ToggleAlwaysOnTop => {
                self.settings.always_on_top = !self.settings.always_on_top;
                self.persist();
                info(format!("Always on top: {}", on_off(self.settings.always_on_top)));
            }
            ConsoleCommand::ToggleUpdateChecks => {
                self.settings.check_updates_enabled = !self.settings.check_updates_enabled;
                self.persist();
                info(format!(
                    "Sound update check at start: {}",
                    on_off(self.settings.check_updates_enabled)
                ));
            }
            ConsoleCommand::Remake => {
                self.timer.reset();
                success("Timer reset");
                self.print_status();
            }
            ConsoleCommand::Surrender => {
                if self.timer.can_surrender() {
                    warning("Surrendered");
                    return Control::Quit;
                }
                warning("Keep going, surrender is only accepted after 15 minutes of work");
            }
            ConsoleCommand::Birthday(mmdd) => {
                self.settings.birthday = Some(mmdd.clone());
                self.selector.set_birthday(Some(mmdd.clone()));
                self.persist();
                success(format!("Birthday set to {mmdd}"));
            }
            ConsoleCommand::Drag { dx, dy } => {
                if !self.timer.phase().is_editable() {
                    warning("Durations can only be edited while idle or paused");
                    return Control::Continue;
                }
                let modifiers = Modifiers {
                    alt: self.timer.edit_target() == EditTarget::Rest,
                    ..Modifiers::default()
                };
                self.pointer(PointerEvent::Press {
                    button: Button::Left,
                    x: 0.0,
                    y: 0.0,
                    modifiers,
                    window: self.window_origin(),
                    on_time_display: true,
                });
                self.pointer(PointerEvent::Move { x: dx, y: -dy });
                self.pointer(PointerEvent::Release);
                info(format!(
                    "{} duration: {}",
                    target_name(self.timer.edit_target()),
                    self.timer.display_text()
                ));
            }
            ConsoleCommand::DoubleClick(quarter) => {
                let height = 100.0;
                let y = (quarter as f64 + 0.5) * height / 4.0;
                let action = self.pointer(PointerEvent::DoubleClick {
                    button: Button::Left,
                    y,
                    height,
                });
                if action == Action::Preset(PresetOutcome::Ignored) {
                    warning("Presets can only be applied while idle or paused");
                }
            }
            ConsoleCommand::MoveWindow { x, y } => {
                let (wx, wy) = self.window_origin();
                self.pointer(PointerEvent::Press {
                    button: Button::Left,
                    x: f64::from(wx),
                    y: f64::from(wy),
                    modifiers: Modifiers {
                        shift: true,
                        ..Modifiers::default()
                    },
                    window: (wx, wy),
                    on_time_display: false,
                });
                self.pointer(PointerEvent::Move {
                    x: f64::from(x),
                    y: f64::from(y),
                });
                self.pointer(PointerEvent::Release);
                info(format!("Window at {x}, {y}"));
            }
            ConsoleCommand::Status => self.print_status(),
            ConsoleCommand::Help => print_help(),
            ConsoleCommand::Quit => return Control::Quit,
        }
        Control::Continue
    }

    fn window_origin(&self) -> (i32, i32) {
        (self.settings.x.unwrap_or(0), self.settings.y.unwrap_or(0))
    }

    fn pointer(&mut self, event: PointerEvent) -> Action {
        let action = self.interaction.handle(event, &mut self.timer);
        match &action {
            Action::MoveWindow { x, y } => {
                self.settings.x = Some(*x);
                self.settings.y = Some(*y);
            }
            Action::WindowPlaced | Action::AdjustFinished { .. } => self.persist(),
            Action::Preset(PresetOutcome::Ignored) => {}
            Action::Preset(outcome) => {
                self.persist();
                report_preset(*outcome);
            }
            Action::DurationChanged { target, secs } => {
                debug!(edit_target = target_name(*target), secs, "duration adjusted");
            }
            Action::OpenMenu { .. } | Action::None => {}
        }
        action
    }

    fn on_sounds_updated(&mut self, report: &DownloadReport) {
        if let Some(reason) = &report.aborted {
            warn!(reason = %reason, "sound update did not complete");
        }
        self.pools = SoundPoolSet::build(&self.env, self.selector.calendar());
        log_info!(clips = self.pools.total_clips(), "sound pools rebuilt");
    }

    fn apply_timer_events(&mut self, events: &[TimerEvent]) -> Control {
        let mut control = Control::Continue;
        for event in events {
            if let Some(cat) = event.cue() {
                self.play(cat);
            }
            match event {
                TimerEvent::Started => success("Work started"),
                TimerEvent::Paused => info("Paused"),
                TimerEvent::Resumed => info("Resumed"),
                TimerEvent::WorkEnded => success("Work finished, time to rest"),
                TimerEvent::RestEnded => success("Rest over, back to work"),
                TimerEvent::IntervalReached => {
                    info(format!("{} elapsed", self.timer.display_text()))
                }
                TimerEvent::ExitRequested => control = Control::Quit,
                TimerEvent::Reset => {}
            }
        }
        control
    }

    fn play(&mut self, cat: Category) {
        let date = (self.clock)();
        let selection = self.selector.select(&self.pools, &self.assets, cat, date);
        if let Some(path) = selection.path() {
            self.sink.play(path);
        }
    }

    fn persist(&mut self) {
        self.timer.store(&mut self.settings);
        self.settings.save_or_warn(&self.env.base_dir);
    }

    /// The one exit path: stop, say goodbye (bounded), save. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if self.settings.exit_voice_enabled {
            self.play(Category::Exit);
            if !self.sink.wait_idle(EXIT_SOUND_WAIT) {
                debug!("exit sound cut short");
            }
        }
        self.sink.stop();
        self.persist();
        log_info!("session ended");
    }

    fn print_status(&self) {
        let remaining = self
            .timer
            .remaining()
            .map(|r| format!(", {} left", crate::utils::format_mmss(r)))
            .unwrap_or_default();
        info(format!(
            "[{}] {}{} (editing {})",
            self.timer.phase().as_str(),
            self.timer.display_text(),
            remaining,
            target_name(self.timer.edit_target())
        ));
    }
}

fn spawn_ticker(tx: Sender<SessionEvent>) -> AppResult<()> {
    thread::Builder::new().name("ticker".into()).spawn(move || {
        loop {
            thread::sleep(TICK);
            if tx.send(SessionEvent::Tick).is_err() {
                break;
            }
        }
    })?;
    Ok(())
}

fn spawn_input(tx: Sender<SessionEvent>) -> AppResult<()> {
    thread::Builder::new().name("console".into()).spawn(move || {
        let _ = read_commands(io::stdin().lock(), &tx);
        let _ = tx.send(SessionEvent::InputClosed);
    })?;
    Ok(())
}

/// Forward commands read from `input` until end of input. Lines that are not
/// valid UTF-8 are decoded lossily rather than ending the session. Returns
/// `Err` when the receiver is gone.
pub fn read_commands<R: BufRead>(
    mut input: R,
    tx: &Sender<SessionEvent>,
) -> Result<(), mpsc::SendError<SessionEvent>> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "console input failed");
                return Ok(());
            }
        }
        let line = String::from_utf8_lossy(&buf);
        match ConsoleCommand::parse(&line) {
            Ok(Some(cmd)) => tx.send(SessionEvent::Command(cmd))?,
            Ok(None) => {}
            Err(e) => warning(e),
        }
    }
}

fn report_preset(outcome: PresetOutcome) {
    match outcome {
        PresetOutcome::WorkSet(secs) => info(format!("Work duration: {} min", secs / 60)),
        PresetOutcome::RestSet(secs) => info(format!("Rest duration: {} min", secs / 60)),
        PresetOutcome::ExitOnWorkEndToggled(on) => {
            info(format!("Exit when work ends: {}", on_off(on)))
        }
        PresetOutcome::Ignored => {}
    }
}

fn target_name(target: EditTarget) -> &'static str {
    match target {
        EditTarget::Work => "work",
        EditTarget::Rest => "rest",
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn print_help() {
    println!(
        "Commands:
  s, <space>   start / pause / resume
  t            switch between editing work and rest
  + / -        lengthen / shorten the edited duration by a minute
  p1 .. p4     preset by quarter (work 15/30/40/60, rest 5/10/15/exit)
  i            cycle interval voice 10 / 15 / 30 / off
  e            toggle exit voice
  x            toggle exit when work ends
  a            toggle always on top
  u            toggle sound update check
  /remake      reset the timer
  /surrender   give up (after 15 minutes of work)
  /bir MMDD    set your birthday
  drag DX DY   drag on the time display (DY > 0 is up)
  dbl 1..4     double-click a quarter of the pet
  move X Y     shift-drag the window to X, Y
  status       show the timer
  q            quit"
    );
}
