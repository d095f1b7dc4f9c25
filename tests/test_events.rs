use std::time::Duration;

use cat_hero::engine::GameStatus;
use cat_hero::events::*;

fn hud() -> HudSnapshot {
    HudSnapshot {
        status: GameStatus::Playing,
        level_index: 1,
        level_name: "Wolf Pack Attack".to_string(),
        current_hp: 4,
        max_hp: 5,
        shield_hp: 0,
        yarn_balls: 0,
        butterflies: 0,
        fish_treats: 0,
        elapsed: Duration::ZERO,
        enemies_killed: 10,
        target_kills: 53,
        total_kills: 40,
        banner: Banner::None,
    }
}

#[test]
fn time_is_minutes_and_padded_seconds() {
    assert_eq!(format_time(Duration::ZERO), "0:00");
    assert_eq!(format_time(Duration::from_millis(9_999)), "0:09");
    assert_eq!(format_time(Duration::from_secs(61)), "1:01");
    assert_eq!(format_time(Duration::from_secs(3600)), "60:00");
}

#[test]
fn hearts_show_lost_hp_and_shield() {
    let mut snapshot = hud();
    assert_eq!(snapshot.hearts(), "♥♥♥♥♡");
    snapshot.shield_hp = 3;
    assert_eq!(snapshot.hearts(), "♥♥♥♥♡◆◆◆");
}

#[test]
fn progress_text_includes_banner() {
    let mut snapshot = hud();
    assert_eq!(snapshot.progress_text(), "10/53 enemies defeated - Wolf Pack Attack");

    snapshot.banner = Banner::Streak { current: 4, threshold: 10 };
    assert!(snapshot.progress_text().ends_with(" | Kill Streak: 4/10"));

    snapshot.banner = Banner::BlastReady;
    assert!(snapshot.progress_text().ends_with("⚡ SWORD BLAST READY! ⚡"));
}

#[test]
fn progress_is_clamped() {
    let mut snapshot = hud();
    snapshot.enemies_killed = 60;
    assert_eq!(snapshot.progress(), 1.0);
    snapshot.target_kills = 0;
    assert_eq!(snapshot.progress(), 1.0);
}
