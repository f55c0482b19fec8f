use std::path::{Path, PathBuf};

use space_invaders::config::*;
use space_invaders::entities::Rules;

#[test]
fn empty_file_gives_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.fps, 60);
    assert_eq!(config.seed, None);
    assert_eq!(config.rules, Rules::default());
}

#[test]
fn partial_rules_keep_other_defaults() {
    let config = Config::from_toml_str("[rules]\ninitial_lives = 5\n").unwrap();
    assert_eq!(config.rules.initial_lives, 5);
    assert_eq!(config.rules.ufo_spawn_chance, 0.001);
    assert_eq!(config.fps, 60);
}

#[test]
fn full_file_parses() {
    let text = r#"
fps = 30
seed = 7
sprites = "art/sprites.toml"
log_file = "invaders.log"

[rules]
initial_lives = 4
ufo_spawn_chance = 0.01
enemy_fire_base = 0.001
enemy_fire_per_level = 0.0002
"#;
    let config = Config::from_toml_str(text).unwrap();
    assert_eq!(config.fps, 30);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.sprites, Some(PathBuf::from("art/sprites.toml")));
    assert_eq!(config.log_file, Some(PathBuf::from("invaders.log")));
    assert_eq!(config.rules.initial_lives, 4);
    assert_eq!(config.rules.enemy_fire_per_level, 0.0002);
}

#[test]
fn zero_fps_rejected() {
    assert!(matches!(
        Config::from_toml_str("fps = 0"),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn zero_lives_rejected() {
    assert!(matches!(
        Config::from_toml_str("[rules]\ninitial_lives = 0"),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn probability_out_of_range_rejected() {
    let err = Config::from_toml_str("[rules]\nufo_spawn_chance = 1.5").unwrap_err();
    assert!(err.to_string().contains("ufo_spawn_chance"));
}

#[test]
fn malformed_toml_rejected() {
    assert!(matches!(
        Config::from_toml_str("fps = \"fast\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let result = Config::load(Some(Path::new("definitely/not/here.toml")));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn loaded_file_is_recorded() {
    let path = std::env::temp_dir().join(format!("invaders-{}.toml", std::process::id()));
    std::fs::write(&path, "fps = 30\n").unwrap();
    let config = Config::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.fps, 30);
    assert_eq!(config.loaded_from, Some(path));
}

#[test]
fn parsed_text_has_no_source_file() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.loaded_from, None);
}
