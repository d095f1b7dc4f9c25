use std::io::Write;
use std::time::Duration;

use cat_hero::config::{AttackMode, GameConfig};
use cat_hero::error::GameError;
use cat_hero::levels::Theme;

#[test]
fn defaults_match_modular_tuning() {
    let config = GameConfig::default();
    assert_eq!(config.attack_mode, AttackMode::SingleTarget);
    assert_eq!(config.levels.len(), 3);
    assert_eq!(config.levels[0].target_kills, 30);
    assert_eq!(config.levels[2].total_enemies(), 75);
    assert_eq!(config.spawn.initial_delay(), Duration::from_secs(1));
    assert_eq!(config.spawn.max_batch, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn classic_tuning_values() {
    let config = GameConfig::classic();
    assert_eq!(config.attack_mode, AttackMode::Area);
    assert_eq!(config.spawn.max_batch, 1);
    assert_eq!(config.spawn.initial_delay(), Duration::from_secs(5));
    assert_eq!(config.levels[0].target_kills, 20);
    assert_eq!(config.levels[1].total_wolves, 5);
    assert_eq!(config.levels[2].theme, Theme::Battlefield);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_ron_keeps_defaults() {
    let config = GameConfig::from_ron_str("(max_hp: 7, attack_mode: Area, spawn: (max_batch: 2))")
        .expect("valid config");
    assert_eq!(config.max_hp, 7);
    assert_eq!(config.attack_mode, AttackMode::Area);
    assert_eq!(config.spawn.max_batch, 2);
    assert_eq!(config.spawn.min_delay_ms, 800);
    assert_eq!(config.world_width, 1600.0);
    assert_eq!(config.levels.len(), 3);
}

#[test]
fn config_survives_ron_round_trip() {
    let config = GameConfig::classic();
    let text = config.to_ron_string().expect("serializes");
    assert_eq!(GameConfig::from_ron_str(&text).expect("parses"), config);
}

#[test]
fn malformed_ron_is_a_parse_error() {
    let err = GameConfig::from_ron_str("(max_hp: ").unwrap_err();
    assert!(matches!(err, GameError::ConfigParse(_)));
}

fn invalid(config: GameConfig) -> String {
    match config.validate() {
        Err(GameError::InvalidConfig(reason)) => reason,
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn validation_rejects_bad_values() {
    assert!(invalid(GameConfig { levels: Vec::new(), ..GameConfig::default() }).contains("levels"));
    assert!(invalid(GameConfig { max_hp: 0, ..GameConfig::default() }).contains("max_hp"));
    assert!(invalid(GameConfig { world_width: 0.0, ..GameConfig::default() }).contains("world"));

    let mut config = GameConfig::default();
    config.spawn.max_batch = 0;
    assert!(invalid(config).contains("max_batch"));

    let mut config = GameConfig::default();
    config.spawn.min_delay_ms = 3000;
    config.spawn.max_delay_ms = 1000;
    assert!(invalid(config).contains("inverted"));

    let mut config = GameConfig::default();
    config.spawn.boar_chance = 1.5;
    assert!(invalid(config).contains("boar_chance"));
}

#[test]
fn validation_rejects_unreachable_target() {
    let mut config = GameConfig::default();
    config.levels[1].target_kills = 100;
    assert!(invalid(config).contains("Wolf Pack Attack"));

    let mut config = GameConfig::default();
    config.levels[0].target_kills = 0;
    assert!(config.validate().is_err());
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "(invulnerability_ms: 1000, streak_threshold: 5)").expect("write");

    let config = GameConfig::load(file.path()).expect("loads");
    assert_eq!(config.invulnerability(), Duration::from_secs(1));
    assert_eq!(config.streak_threshold, 5);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = GameConfig::load(dir.path().join("nope.ron")).unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
}

#[test]
fn load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "(max_hp: 0)").expect("write");
    assert!(matches!(GameConfig::load(file.path()), Err(GameError::InvalidConfig(_))));
}

#[test]
fn background_color_parsing_never_panics() {
    let mut level = GameConfig::default().levels.remove(0);
    assert_eq!(level.background_rgb(), Some((0x7C, 0xB3, 0x42)));

    for bad in ["#aé123", "#12345", "7CB342", "#GGGGGG", "#1234567", ""] {
        level.background_color = bad.to_string();
        assert_eq!(level.background_rgb(), None, "{:?}", bad);
    }
}

#[test]
fn validation_rejects_malformed_background_color() {
    let mut config = GameConfig::default();
    config.levels[0].background_color = "#aé123".to_string();
    assert!(invalid(config).contains("background_color"));

    let text = r##"(levels: [(name: "Odd", background_color: "#aé123", total_boars: 1,
        total_wolves: 0, target_kills: 1, theme: Garden, description: "")])"##;
    assert!(matches!(GameConfig::from_ron_str(text), Err(GameError::InvalidConfig(_))));
}

#[test]
fn validation_rejects_non_finite_sizes() {
    assert!(matches!(
        GameConfig::from_ron_str("(world_width: NaN)"),
        Err(GameError::InvalidConfig(_))
    ));
    assert!(invalid(GameConfig { world_height: f32::INFINITY, ..GameConfig::default() }).contains("world"));

    assert!(invalid(GameConfig { range_unit: f32::NAN, ..GameConfig::default() }).contains("range_unit"));
    assert!(invalid(GameConfig { blast_radius: f32::INFINITY, ..GameConfig::default() }).contains("blast_radius"));
    assert!(invalid(GameConfig { contact_distance: -1.0, ..GameConfig::default() }).contains("contact_distance"));
    assert!(invalid(GameConfig { pickup_distance: f32::NAN, ..GameConfig::default() }).contains("pickup_distance"));

    let mut config = GameConfig::default();
    config.spawn.edge_offset = f32::NAN;
    assert!(invalid(config).contains("edge_offset"));
}
