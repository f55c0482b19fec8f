use space_invaders::compute::init_state;
use space_invaders::entities::*;

#[test]
fn entity_clone_and_eq() {
    // Enums derive PartialEq, so equality comparisons must work
    assert_eq!(EnemyKind::Squid, EnemyKind::Squid);
    assert_ne!(EnemyKind::Squid, EnemyKind::Octopus);
    assert_eq!(GameMode::Playing, GameMode::Playing);
    assert_ne!(GameMode::Playing, GameMode::Paused);

    // Copy types stay equal after being moved around
    let kind = EnemyKind::Crab;
    let copied = kind;
    assert_eq!(kind, copied);
}

#[test]
fn game_state_clone_is_independent() {
    let original = init_state(Rules::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99;
    cloned.score = 999;
    cloned.enemies.push(Enemy {
        x: 5,
        y: 5,
        vx: 1,
        vy: 0,
        kind: EnemyKind::Squid,
        frame: 0,
    });
    cloned.player_bullet = Some(PlayerBullet { x: 1, y: 1, vy: -4 });

    assert_eq!(original.player.x, 304);
    assert_eq!(original.score, 0);
    assert!(original.enemies.is_empty());
    assert!(original.player_bullet.is_none());
}

#[test]
fn default_rules() {
    let rules = Rules::default();
    assert_eq!(rules.initial_lives, 3);
    assert_eq!(rules.ufo_spawn_chance, 0.001);
    assert_eq!(rules.enemy_fire_base, 0.0005);
    assert_eq!(rules.enemy_fire_per_level, 0.0001);
}

#[test]
fn geometry_stays_on_the_four_unit_grid() {
    // Exact-row hits only work if every row a bullet can visit lines up.
    assert_eq!(PLAYER_Y, 420);
    for value in [
        PLAYER_Y,
        FORMATION_TOP,
        ROW_SPACING,
        ROW_DROP,
        MUZZLE_OFFSET,
        UFO_START_Y,
        SPRITE_SIZE / 2,
    ] {
        assert_eq!(value % PLAYER_BULLET_SPEED, 0, "{} off grid", value);
        assert_eq!(value % ENEMY_BULLET_SPEED, 0, "{} off grid", value);
    }
}

#[test]
fn formation_fits_inside_the_playfield() {
    let right_edge = FORMATION_LEFT + (FORMATION_COLUMNS as i32 - 1) * COLUMN_SPACING;
    assert!(FORMATION_LEFT > 0);
    assert!(right_edge <= FRAME_WIDTH - SPRITE_SIZE);
    let bottom = FORMATION_TOP + (FORMATION_ROWS.len() as i32 - 1) * ROW_SPACING;
    assert!(bottom < PLAYER_Y);
}
