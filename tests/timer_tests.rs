use pomodoro_pet::config::Settings;
use pomodoro_pet::core::timer::{PresetOutcome, TimerEvent, TimerState};
use pomodoro_pet::models::{ActivePhase, EditTarget, Phase};

fn timer(work: u32, rest: u32, interval_enabled: bool) -> TimerState {
    let settings = Settings {
        work_duration: work,
        rest_duration: rest,
        ..Settings::default()
    };
    TimerState::from_settings(&settings, interval_enabled)
}

fn tick_n(t: &mut TimerState, n: u32) -> Vec<TimerEvent> {
    let mut all = Vec::new();
    for _ in 0..n {
        all.extend(t.tick());
    }
    all
}

#[test]
fn test_work_rest_cycle() {
    let mut t = timer(1500, 300, false);
    assert_eq!(t.phase(), Phase::Idle);

    assert_eq!(t.start(), vec![TimerEvent::Started]);
    assert_eq!(t.phase(), Phase::Working);

    assert!(tick_n(&mut t, 1499).is_empty());
    assert_eq!(t.elapsed(), 1499);
    assert_eq!(t.remaining(), Some(1));

    assert_eq!(t.tick(), vec![TimerEvent::WorkEnded]);
    assert_eq!(t.phase(), Phase::Resting);
    assert_eq!(t.elapsed(), 0);

    assert!(tick_n(&mut t, 299).is_empty());
    assert_eq!(t.tick(), vec![TimerEvent::RestEnded]);
    assert_eq!(t.phase(), Phase::Working);
    assert_eq!(t.elapsed(), 0);
}

#[test]
fn test_idle_tick_is_noop() {
    let mut t = timer(1500, 300, true);
    assert!(t.tick().is_empty());
    assert_eq!(t.elapsed(), 0);
    assert_eq!(t.phase(), Phase::Idle);
}

#[test]
fn test_pause_keeps_elapsed() {
    let mut t = timer(1500, 300, false);
    t.start();
    tick_n(&mut t, 42);

    assert_eq!(t.toggle(), vec![TimerEvent::Paused]);
    assert_eq!(
        t.phase(),
        Phase::Paused {
            suspended: ActivePhase::Working
        }
    );
    assert!(tick_n(&mut t, 10).is_empty());
    assert_eq!(t.elapsed(), 42);

    assert_eq!(t.toggle(), vec![TimerEvent::Resumed]);
    assert_eq!(t.phase(), Phase::Working);
    t.tick();
    assert_eq!(t.elapsed(), 43);
}

#[test]
fn test_pause_when_idle_does_nothing() {
    let mut t = timer(1500, 300, false);
    assert!(t.pause().is_empty());
    assert!(t.resume().is_empty());
    assert_eq!(t.phase(), Phase::Idle);
}

#[test]
fn test_exit_on_work_end_requests_exit() {
    let mut t = timer(300, 60, false);
    t.toggle_exit_on_work_end();
    t.start();

    assert!(tick_n(&mut t, 299).is_empty());
    assert_eq!(
        t.tick(),
        vec![TimerEvent::WorkEnded, TimerEvent::ExitRequested]
    );
    // never enters resting
    assert_eq!(t.phase(), Phase::Working);
}

#[test]
fn test_interval_voice_on_exact_multiples() {
    let mut t = timer(3600, 300, true);
    t.start();

    let events = tick_n(&mut t, 599);
    assert!(!events.contains(&TimerEvent::IntervalReached));
    assert_eq!(t.tick(), vec![TimerEvent::IntervalReached]);
    assert!(tick_n(&mut t, 599).is_empty());
    assert_eq!(t.tick(), vec![TimerEvent::IntervalReached]);
    assert_eq!(t.elapsed(), 1200);
}

#[test]
fn test_interval_voice_disabled() {
    let mut t = timer(3600, 300, false);
    t.start();
    assert!(tick_n(&mut t, 1800).is_empty());

    let mut t = timer(3600, 300, true);
    t.set_voice_interval(0);
    t.start();
    assert!(tick_n(&mut t, 1800).is_empty());
}

#[test]
fn test_interval_voice_not_while_resting() {
    let mut t = timer(300, 900, true);
    t.set_voice_interval(10);
    t.start();
    tick_n(&mut t, 300);
    assert_eq!(t.phase(), Phase::Resting);
    assert!(!tick_n(&mut t, 600).contains(&TimerEvent::IntervalReached));
}

#[test]
fn test_durations_are_clamped() {
    let mut t = timer(1500, 300, false);
    assert_eq!(t.set_work_duration(10), 300);
    assert_eq!(t.set_work_duration(100_000), 3600);
    assert_eq!(t.set_work_duration(-50), 300);
    assert_eq!(t.set_rest_duration(1), 30);
    assert_eq!(t.set_rest_duration(5000), 900);
    assert_eq!(t.set_duration(EditTarget::Rest, 120), 120);
    assert_eq!(t.rest_duration(), 120);
}

#[test]
fn test_settings_out_of_range_are_clamped_on_load() {
    let t = timer(1, 100_000, false);
    assert_eq!(t.work_duration(), 300);
    assert_eq!(t.rest_duration(), 900);
}

#[test]
fn test_presets_work_target() {
    let mut t = timer(1500, 300, false);
    assert_eq!(t.apply_preset(0), PresetOutcome::WorkSet(900));
    assert_eq!(t.apply_preset(1), PresetOutcome::WorkSet(1800));
    assert_eq!(t.apply_preset(2), PresetOutcome::WorkSet(2400));
    assert_eq!(t.apply_preset(3), PresetOutcome::WorkSet(3600));
    assert_eq!(t.display_text(), "60:00");
}

#[test]
fn test_presets_rest_target() {
    let mut t = timer(1500, 300, false);
    assert!(t.toggle_edit_target());
    assert_eq!(t.edit_target(), EditTarget::Rest);

    assert_eq!(t.apply_preset(1), PresetOutcome::RestSet(600));
    assert_eq!(t.apply_preset(3), PresetOutcome::ExitOnWorkEndToggled(true));
    assert!(t.exit_on_work_end());
    assert_eq!(t.display_text(), "INF");

    // picking a rest length turns exit-on-work-end back off
    assert_eq!(t.apply_preset(0), PresetOutcome::RestSet(300));
    assert!(!t.exit_on_work_end());
    assert_eq!(t.display_text(), "05:00");
}

#[test]
fn test_presets_ignored_while_counting() {
    let mut t = timer(1500, 300, false);
    t.start();
    assert_eq!(t.apply_preset(0), PresetOutcome::Ignored);
    assert!(!t.toggle_edit_target());
    assert_eq!(t.work_duration(), 1500);

    t.pause();
    assert_eq!(t.apply_preset(0), PresetOutcome::WorkSet(900));
}

#[test]
fn test_cycle_voice_interval() {
    let mut t = timer(1500, 300, true);
    assert_eq!(t.interval_minutes(), 10);
    assert_eq!(t.cycle_voice_interval(), 15);
    assert_eq!(t.cycle_voice_interval(), 30);
    assert_eq!(t.cycle_voice_interval(), 0);
    assert_eq!(t.cycle_voice_interval(), 10);

    t.set_voice_interval(7);
    assert_eq!(t.cycle_voice_interval(), 10);
}

#[test]
fn test_reset_returns_to_idle() {
    let mut t = timer(1500, 300, false);
    t.start();
    tick_n(&mut t, 100);
    assert_eq!(t.reset(), vec![TimerEvent::Reset]);
    assert_eq!(t.phase(), Phase::Idle);
    assert_eq!(t.elapsed(), 0);
    assert_eq!(t.display_text(), "25:00");
}

#[test]
fn test_surrender_needs_fifteen_minutes() {
    let mut t = timer(3600, 300, false);
    assert!(!t.can_surrender());
    t.start();
    tick_n(&mut t, 900);
    assert!(!t.can_surrender());
    t.tick();
    assert!(t.can_surrender());

    t.pause();
    assert!(!t.can_surrender());
}

#[test]
fn test_store_writes_back_settings() {
    let mut t = timer(1500, 300, true);
    t.set_work_duration(1200);
    t.cycle_voice_interval();
    t.toggle_exit_on_work_end();

    let mut settings = Settings::default();
    t.store(&mut settings);
    assert_eq!(settings.work_duration, 1200);
    assert_eq!(settings.rest_duration, 300);
    assert_eq!(settings.voice_interval_minutes, 15);
    assert!(settings.exit_on_work_end);
}

#[test]
fn test_cues() {
    use pomodoro_pet::models::Category;
    assert_eq!(TimerEvent::Started.cue(), Some(Category::Start));
    assert_eq!(TimerEvent::RestEnded.cue(), Some(Category::Start));
    assert_eq!(TimerEvent::WorkEnded.cue(), Some(Category::End));
    assert_eq!(TimerEvent::Resumed.cue(), Some(Category::Resume));
    assert_eq!(TimerEvent::IntervalReached.cue(), Some(Category::Interval));
    assert_eq!(TimerEvent::Paused.cue(), None);
    assert_eq!(TimerEvent::ExitRequested.cue(), None);
}
