use pomodoro_pet::core::player::{LOG_HISTORY, LogSink, ProcessSink, SoundSink};
use std::time::{Duration, Instant};

mod common;
use common::Sandbox;

#[test]
fn test_log_sink_keeps_recent_clips_only() {
    let sb = Sandbox::new();
    let mut sink = LogSink::new();
    for i in 0..LOG_HISTORY + 10 {
        sink.play(&sb.base().join(format!("clip{i}.mp3")));
    }
    assert_eq!(sink.played().len(), LOG_HISTORY);
    assert!(sink.played()[0].ends_with("clip10.mp3"));
    assert!(
        sink.played()
            .last()
            .unwrap()
            .ends_with(format!("clip{}.mp3", LOG_HISTORY + 9))
    );
}

#[test]
fn test_player_switched_off() {
    let sb = Sandbox::new();
    for value in ["none", "OFF", "0"] {
        let env = sb.env_with(&[("POMODORO_PLAYER", value)]);
        assert!(ProcessSink::detect(&env).is_none(), "{value}");
    }
    let env = sb.env_with(&[("POMODORO_PLAYER", "mpv --no-video")]);
    assert!(ProcessSink::detect(&env).is_some());
}

#[test]
fn test_missing_clip_is_not_queued() {
    let sb = Sandbox::new();
    let mut sink = ProcessSink::new("sh", ["-c", "sleep 30", "player"]);
    sink.play(&sb.base().join("nope.mp3"));
    assert!(!sink.is_busy());
    assert!(sink.wait_idle(Duration::from_millis(10)));
}

#[test]
fn test_unstartable_player_stays_silent() {
    let sb = Sandbox::new();
    let clip = sb.touch("sounds/start/a.mp3");
    let mut sink = ProcessSink::new("pomodoro-pet-no-such-player", Vec::<String>::new());
    sink.play(&clip);
    assert!(!sink.is_busy());
}

#[cfg(unix)]
#[test]
fn test_queue_drains_in_order() {
    let sb = Sandbox::new();
    let log = sb.base().join("order.txt");
    let script = format!("echo \"$1\" >> '{}'", log.display());
    let mut sink = ProcessSink::new("sh", ["-c", script.as_str(), "player"]);
    let a = sb.touch("sounds/start/a.mp3");
    let b = sb.touch("sounds/start/b.mp3");

    sink.play(&a);
    sink.play(&b);
    assert!(sink.wait_idle(Duration::from_secs(5)));

    let order = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = order.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("a.mp3"));
    assert!(lines[1].ends_with("b.mp3"));
}

#[cfg(unix)]
#[test]
fn test_wait_idle_gives_up_at_timeout() {
    let sb = Sandbox::new();
    let clip = sb.touch("sounds/exit.mp3");
    let mut sink = ProcessSink::new("sh", ["-c", "sleep 30", "player"]);
    sink.play(&clip);

    let started = Instant::now();
    assert!(!sink.wait_idle(Duration::from_millis(300)));
    let took = started.elapsed();
    assert!(took >= Duration::from_millis(300));
    assert!(took < Duration::from_secs(2), "{took:?}");

    sink.stop();
    assert!(!sink.is_busy());
}
