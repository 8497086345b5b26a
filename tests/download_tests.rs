use pomodoro_pet::config::Settings;
use pomodoro_pet::core::download::{
    DownloadManager, DownloadReport, SoundSource, already_present, files_to_keep_deleted,
};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

mod common;
use common::{Sandbox, strings};

#[test]
fn test_source_from_url() {
    assert_eq!(
        SoundSource::from_url("https://git.example.com/voices.git"),
        Some(SoundSource::Git("https://git.example.com/voices.git".into()))
    );
    assert_eq!(
        SoundSource::from_url("https://cdn.example.com/pack/list.json"),
        Some(SoundSource::Manifest("https://cdn.example.com/pack/list.json".into()))
    );
    assert_eq!(
        SoundSource::from_url("https://cdn.example.com/pack/"),
        Some(SoundSource::Manifest("https://cdn.example.com/pack/manifest.json".into()))
    );
    assert_eq!(SoundSource::from_url("   "), None);
}

#[test]
fn test_env_url_overrides_settings() {
    let sb = Sandbox::new();
    let settings = Settings {
        sounds_update_url: "https://cdn.example.com/pack".into(),
        ..Settings::default()
    };

    let plain = DownloadManager::new(&sb.env(), &settings);
    assert_eq!(
        plain.source(),
        Some(&SoundSource::Manifest("https://cdn.example.com/pack/manifest.json".into()))
    );

    let env = sb.env_with(&[("POMODORO_SOUNDS_URL", "https://git.example.com/v.git")]);
    let overridden = DownloadManager::new(&env, &settings);
    assert_eq!(
        overridden.source(),
        Some(&SoundSource::Git("https://git.example.com/v.git".into()))
    );

    let none = DownloadManager::new(&sb.env(), &Settings::default());
    assert_eq!(none.source(), None);
}

#[test]
fn test_keep_user_deletions_unless_upstream_changed() {
    let deleted = strings(&["start/a.mp3", "end/b.mp3", "end/c.mp3"]);
    let changed = strings(&["end/b.mp3", "resume/new.mp3"]);
    assert_eq!(
        files_to_keep_deleted(&deleted, &changed),
        strings(&["start/a.mp3", "end/c.mp3"])
    );
    assert!(files_to_keep_deleted(&[], &changed).is_empty());
}

#[test]
fn test_already_present() {
    let sb = Sandbox::new();
    let full = sb.touch("sounds/cloud/start/a.mp3");
    let empty = sb.write("sounds/cloud/start/b.mp3", "");
    assert!(already_present(&full));
    assert!(!already_present(&empty));
    assert!(!already_present(&sb.base().join("sounds/cloud/start/c.mp3")));
    assert!(!already_present(&sb.base().join("sounds/cloud/start")));
}

#[test]
fn test_no_source_is_a_quiet_noop() {
    let sb = Sandbox::new();
    let cloud = sb.env().cloud_dir();
    let report = DownloadManager::with_source(cloud.clone(), None).run();
    assert_eq!(report, DownloadReport::default());
    assert!(!cloud.exists());
}

#[test]
fn test_unreachable_manifest_aborts_without_panic() {
    let sb = Sandbox::new();
    let cloud = sb.env().cloud_dir();
    let manager = DownloadManager::with_source(
        cloud.clone(),
        Some(SoundSource::Manifest("http://127.0.0.1:9/manifest.json".into())),
    );

    let (tx, rx) = mpsc::channel();
    let handle = manager
        .spawn(move |report| {
            tx.send(report).unwrap();
        })
        .expect("spawn worker");
    let report = rx
        .recv_timeout(Duration::from_secs(30))
        .expect("completion is always reported");
    handle.join().unwrap();

    assert!(report.aborted.is_some());
    assert_eq!(report.downloaded, 0);
    assert!(!cloud.exists());
}

/// Serve a manifest naming one clip, then that clip after `clip_delay`.
fn serve_slow_clip(clip_delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().unwrap());
    let manifest = format!(r#"["{base}/slow.mp3"]"#);

    thread::spawn(move || {
        for stream in listener.incoming().take(2) {
            let Ok(mut stream) = stream else { continue };
            let mut request_line = String::new();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap_or(0) <= 2 {
                    break;
                }
            }

            let body = if request_line.contains("manifest.json") {
                manifest.clone().into_bytes()
            } else {
                thread::sleep(clip_delay);
                b"RIFF".to_vec()
            };
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
        }
    });
    format!("{base}/manifest.json")
}

#[test]
fn test_clip_gets_longer_limit_than_manifest() {
    let sb = Sandbox::new();
    let cloud = sb.env().cloud_dir();
    let url = serve_slow_clip(Duration::from_millis(800));

    let report = DownloadManager::with_source(cloud.clone(), Some(SoundSource::Manifest(url)))
        .with_timeouts(Duration::from_millis(400), Duration::from_secs(10))
        .run();

    assert_eq!(report.aborted, None);
    assert_eq!(report.downloaded, 1);
    assert!(cloud.join("start/slow.mp3").exists());
}

#[test]
fn test_stalled_clip_fails_alone() {
    let sb = Sandbox::new();
    let cloud = sb.env().cloud_dir();
    let url = serve_slow_clip(Duration::from_secs(3));

    let report = DownloadManager::with_source(cloud.clone(), Some(SoundSource::Manifest(url)))
        .with_timeouts(Duration::from_secs(10), Duration::from_millis(200))
        .run();

    assert_eq!(report.aborted, None);
    assert_eq!(report.downloaded, 0);
    assert_eq!(report.failed, 1);
    assert!(!cloud.join("start/slow.mp3").exists());
}

#[test]
fn test_git_refuses_non_checkout_directory() {
    let sb = Sandbox::new();
    let cloud = sb.env().cloud_dir();
    let kept = sb.touch("sounds/cloud/start/mine.mp3");

    let report = DownloadManager::with_source(
        cloud,
        Some(SoundSource::Git("https://git.invalid/voices.git".into())),
    )
    .run();

    let reason = report.aborted.expect("aborted");
    assert!(reason.contains("not a git checkout"));
    assert!(kept.exists());
    assert_eq!(fs::read(&kept).unwrap(), b"RIFF");
}
