/// All game entity types: pure data, no logic.
///
/// Coordinates live in a logical 640×480 playfield (origin top-left, y grows
/// downward).  The renderer scales them onto whatever surface it draws to.

use serde::Deserialize;

// ── Playfield geometry ────────────────────────────────────────────────────────

pub const FRAME_WIDTH: i32 = 640;
pub const FRAME_HEIGHT: i32 = 480;

/// Row the player ship sits on.  Enemies reaching it end the game.
pub const PLAYER_Y: i32 = FRAME_HEIGHT / 2 + FRAME_HEIGHT / 4 + FRAME_HEIGHT / 8;
/// Row of the top formation line.
pub const FORMATION_TOP: i32 = 40;
/// Column of the leftmost formation line.
pub const FORMATION_LEFT: i32 = 16;

/// Width of every sprite (player, enemies, UFO).
pub const SPRITE_SIZE: i32 = 32;
/// Horizontal tolerance of the hit check, measured from the target's x.
pub const HIT_HALF_WIDTH: i32 = SPRITE_SIZE / 2;

pub const FORMATION_COLUMNS: usize = 11;
pub const COLUMN_SPACING: i32 = 32;
pub const ROW_SPACING: i32 = 32;
/// One formation line per entry, top to bottom.
pub const FORMATION_ROWS: [EnemyKind; 5] = [
    EnemyKind::Squid,
    EnemyKind::Crab,
    EnemyKind::Crab,
    EnemyKind::Octopus,
    EnemyKind::Octopus,
];

/// Horizontal formation speed (units per tick).
pub const ENEMY_STEP: i32 = 1;
/// Vertical drop applied to the whole formation on every reversal.
pub const ROW_DROP: i32 = 16;

pub const PLAYER_STEP: i32 = 4;
pub const PLAYER_BULLET_SPEED: i32 = 4;
pub const ENEMY_BULLET_SPEED: i32 = 4;
/// Player shots appear this far below the player row.
pub const MUZZLE_OFFSET: i32 = 4;

pub const UFO_START_X: i32 = 10;
pub const UFO_START_Y: i32 = 16;
pub const UFO_SPEED: i32 = 2;

/// Animation counter wraps once it exceeds this value.
pub const ANIMATION_PERIOD: u32 = 60;
/// Death markers are dropped once their counter exceeds this value.
pub const DEATH_ANIMATION_FRAMES: u32 = 5;

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Squid,
    Crab,
    Octopus,
    Ufo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Start,
    Playing,
    Paused,
    GameOver,
}

// ── Tunables ──────────────────────────────────────────────────────────────────

/// Gameplay knobs that the config file may override.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub initial_lives: u32,
    /// Per-tick probability of a UFO appearing while none is on screen.
    pub ufo_spawn_chance: f64,
    /// Per-enemy, per-tick fire probability on level 0.
    pub enemy_fire_base: f64,
    /// Added to the fire probability for every level cleared.
    pub enemy_fire_per_level: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            ufo_spawn_chance: 0.001,
            enemy_fire_base: 0.0005,
            enemy_fire_per_level: 0.0001,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBullet {
    pub x: i32,
    pub y: i32,
    pub vy: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBullet {
    pub x: i32,
    pub y: i32,
    pub vy: i32,
}

// ── Player & enemies ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    /// Pending horizontal movement, consumed once per tick.
    pub vx: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub kind: EnemyKind,
    /// Animation counter in `0..=ANIMATION_PERIOD`.
    pub frame: u32,
}

/// A short-lived marker left where an enemy was destroyed.
#[derive(Clone, Debug, PartialEq)]
pub struct DeathAnimation {
    pub x: i32,
    pub y: i32,
    pub frame: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// The single in-flight player shot, if any.
    pub player_bullet: Option<PlayerBullet>,
    /// The formation, in spawn order.
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub death_anims: Vec<DeathAnimation>,
    pub ufo: Option<Enemy>,
    pub mode: GameMode,
    pub score: u32,
    pub lives: u32,
    /// Number of waves spawned so far.
    pub level: u32,
    pub frame: u64,
    pub rules: Rules,
}
