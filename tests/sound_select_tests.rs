use pomodoro_pet::core::assets::AssetResolver;
use pomodoro_pet::core::calendar::CalendarConfig;
use pomodoro_pet::core::environment::Environment;
use pomodoro_pet::core::sound_pool::SoundPoolSet;
use pomodoro_pet::core::sound_select::{PoolSource, Selection, SoundSelector};
use pomodoro_pet::models::Category;
use std::collections::HashSet;
use std::path::PathBuf;

mod common;
use common::{Sandbox, date};

const XMAS: &str = r#"{"holidays": [{"id": "xmas", "month": 12, "days": [25, 26]}]}"#;

struct Fixture {
    pools: SoundPoolSet,
    assets: AssetResolver,
    selector: SoundSelector,
}

fn fixture(env: &Environment, calendar: CalendarConfig, birthday: Option<&str>) -> Fixture {
    Fixture {
        pools: SoundPoolSet::build(env, &calendar),
        assets: AssetResolver::new(env),
        selector: SoundSelector::new(env, calendar, birthday.map(String::from)).with_seed(7),
    }
}

impl Fixture {
    fn pick(&mut self, cat: Category, y: i32, m: u32, d: u32) -> Selection {
        self.selector
            .select(&self.pools, &self.assets, cat, date(y, m, d))
    }

    fn names(&mut self, cat: Category, y: i32, m: u32, d: u32, n: usize) -> HashSet<String> {
        (0..n)
            .filter_map(|_| self.pick(cat, y, m, d).path().cloned())
            .map(|p: PathBuf| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }
}

#[test]
fn test_tag_pool_always_wins() {
    let sb = Sandbox::new();
    sb.touch("sounds/start/base.mp3");
    sb.touch("sounds/start/winter/snow.mp3");
    sb.touch("sounds/start/xmas/bells.mp3");
    sb.touch("sounds/start/tags/cat/meow.mp3");
    let env = sb.env_with(&[("POMODORO_TAG", "Cat")]);
    let cal = CalendarConfig::parse(XMAS).unwrap();
    let mut f = fixture(&env, cal, None);

    for _ in 0..50 {
        let sel = f.pick(Category::Start, 2025, 12, 25);
        assert_eq!(sel.source(), Some(PoolSource::Tag));
        assert!(sel.path().unwrap().ends_with("tags/cat/meow.mp3"));
    }
}

#[test]
fn test_theme_is_an_alias_for_tag() {
    let sb = Sandbox::new();
    sb.touch("sounds/end/base.mp3");
    sb.touch("sounds/end/tags/robot/beep.mp3");
    let env = sb.env_with(&[("POMODORO_THEME", "robot")]);
    let mut f = fixture(&env, CalendarConfig::default(), None);
    assert_eq!(
        f.pick(Category::End, 2025, 5, 1).source(),
        Some(PoolSource::Tag)
    );
}

#[test]
fn test_unknown_tag_falls_through() {
    let sb = Sandbox::new();
    sb.touch("sounds/start/base.mp3");
    let env = sb.env_with(&[("POMODORO_TAG", "dog")]);
    let mut f = fixture(&env, CalendarConfig::default(), None);
    assert_eq!(
        f.pick(Category::Start, 2025, 5, 1).source(),
        Some(PoolSource::Base)
    );
}

#[test]
fn test_holiday_first_then_mixed() {
    let sb = Sandbox::new();
    sb.touch("sounds/start/base.mp3");
    sb.touch("sounds/start/xmas/bells.mp3");
    let mut f = fixture(&sb.env(), CalendarConfig::parse(XMAS).unwrap(), None);

    let first = f.pick(Category::Start, 2025, 12, 25);
    assert_eq!(first.source(), Some(PoolSource::Holiday));
    assert!(first.path().unwrap().ends_with("bells.mp3"));

    for _ in 0..20 {
        assert_eq!(
            f.pick(Category::Start, 2025, 12, 25).source(),
            Some(PoolSource::Mixed)
        );
    }
    let seen = f.names(Category::Start, 2025, 12, 25, 200);
    assert!(seen.contains("base.mp3"));
    assert!(seen.contains("bells.mp3"));

    // a new holiday day starts exclusive again
    assert_eq!(
        f.pick(Category::Start, 2025, 12, 26).source(),
        Some(PoolSource::Holiday)
    );
}

#[test]
fn test_holiday_priority_is_per_category() {
    let sb = Sandbox::new();
    sb.touch("sounds/holidays/xmas/common/hohoho.mp3");
    sb.touch("sounds/start/base.mp3");
    sb.touch("sounds/end/base.mp3");
    let mut f = fixture(&sb.env(), CalendarConfig::parse(XMAS).unwrap(), None);

    assert_eq!(
        f.pick(Category::Start, 2025, 12, 25).source(),
        Some(PoolSource::Holiday)
    );
    let end = f.pick(Category::End, 2025, 12, 25);
    assert_eq!(end.source(), Some(PoolSource::Holiday));
    assert!(end.path().unwrap().ends_with("hohoho.mp3"));
}

#[test]
fn test_not_a_holiday_uses_base_and_season() {
    let sb = Sandbox::new();
    sb.touch("sounds/start/base.mp3");
    sb.touch("sounds/start/xmas/bells.mp3");
    sb.touch("sounds/start/winter/snow.mp3");
    sb.touch("sounds/start/summer/sun.mp3");
    let mut f = fixture(&sb.env(), CalendarConfig::parse(XMAS).unwrap(), None);

    assert_eq!(
        f.pick(Category::Start, 2026, 1, 10).source(),
        Some(PoolSource::Season)
    );
    let seen = f.names(Category::Start, 2026, 1, 10, 200);
    let expected: HashSet<String> = ["base.mp3", "snow.mp3"].iter().map(|s| s.to_string()).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_season_override() {
    let sb = Sandbox::new();
    sb.touch("sounds/start/summer/sun.mp3");
    let env = sb.env_with(&[("POMODORO_SEASON", "SUMMER")]);
    let mut f = fixture(&env, CalendarConfig::default(), None);
    let sel = f.pick(Category::Start, 2026, 1, 10);
    assert_eq!(sel.source(), Some(PoolSource::Season));
    assert!(sel.path().unwrap().ends_with("sun.mp3"));
}

#[test]
fn test_birthday_clips() {
    let sb = Sandbox::new();
    sb.touch("sounds/start/base.mp3");
    sb.touch("sounds/start/birthday/cake.mp3");
    let mut f = fixture(&sb.env(), CalendarConfig::default(), Some("0704"));

    let sel = f.pick(Category::Start, 2025, 7, 4);
    assert_eq!(sel.source(), Some(PoolSource::Holiday));
    assert!(sel.path().unwrap().ends_with("cake.mp3"));

    // birthday folders never leak into ordinary days
    let seen = f.names(Category::Start, 2025, 7, 5, 50);
    assert!(!seen.contains("cake.mp3"));
}

#[test]
fn test_default_file_then_silence() {
    let sb = Sandbox::new();
    let mut f = fixture(&sb.env(), CalendarConfig::default(), None);
    assert_eq!(f.pick(Category::Exit, 2025, 5, 1), Selection::Silence);

    let exit = sb.touch("sounds/exit.mp3");
    let sel = f.pick(Category::Exit, 2025, 5, 1);
    assert_eq!(sel.source(), Some(PoolSource::DefaultFile));
    assert_eq!(sel.path(), Some(&exit));

    let none = f.selector.select_with_default(
        &f.pools,
        &f.assets,
        Category::Exit,
        None,
        date(2025, 5, 1),
    );
    assert_eq!(none, Selection::Silence);
}

#[test]
fn test_greeting() {
    let sb = Sandbox::new();
    sb.touch("sounds/holidays/xmas/greeting/merry.mp3");
    let mut f = fixture(&sb.env(), CalendarConfig::parse(XMAS).unwrap(), None);

    assert!(f.selector.greeting(&f.pools, date(2025, 12, 25)).is_some());
    assert!(f.selector.greeting(&f.pools, date(2025, 12, 27)).is_none());
}
