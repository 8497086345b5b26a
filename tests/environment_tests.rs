use pomodoro_pet::core::environment::flag_enabled;

mod common;
use common::Sandbox;

#[test]
fn test_flag_enabled_only_for_true_words() {
    assert!(flag_enabled(None, true));
    assert!(!flag_enabled(None, false));
    for on in ["1", "true", " YES ", "On"] {
        assert!(flag_enabled(Some(on), true), "{on}");
        assert!(flag_enabled(Some(on), false), "{on}");
    }
    for off in ["0", "false", "off", "2", "enabled", ""] {
        assert!(!flag_enabled(Some(off), true), "{off}");
    }
}

#[test]
fn test_interval_voice_switch() {
    let sb = Sandbox::new();
    assert!(sb.env().interval_voice_enabled);
    assert!(sb.env_with(&[("POMODORO_TEN_ENABLE", "yes")]).interval_voice_enabled);
    assert!(!sb.env_with(&[("POMODORO_TEN_ENABLE", "no")]).interval_voice_enabled);
    assert!(!sb.env_with(&[("POMODORO_TEN_ENABLE", "2")]).interval_voice_enabled);
}

#[test]
fn test_player_variable() {
    let sb = Sandbox::new();
    assert_eq!(sb.env().player, None);
    assert_eq!(sb.env_with(&[("POMODORO_PLAYER", "  ")]).player, None);
    assert_eq!(
        sb.env_with(&[("POMODORO_PLAYER", " mpv --no-video ")]).player,
        Some("mpv --no-video".to_string())
    );
}
