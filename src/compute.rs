/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle or a controls snapshot) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG and log output.

use log::{debug, info};
use rand::Rng;

use crate::entities::{
    DeathAnimation, Enemy, EnemyBullet, EnemyKind, GameMode, GameState, Player, PlayerBullet,
    Rules, ANIMATION_PERIOD, COLUMN_SPACING, DEATH_ANIMATION_FRAMES, ENEMY_BULLET_SPEED,
    ENEMY_STEP, FORMATION_COLUMNS, FORMATION_LEFT, FORMATION_ROWS, FORMATION_TOP, FRAME_HEIGHT,
    FRAME_WIDTH, HIT_HALF_WIDTH, MUZZLE_OFFSET, PLAYER_BULLET_SPEED, PLAYER_STEP, PLAYER_Y, ROW_DROP,
    ROW_SPACING, SPRITE_SIZE, UFO_SPEED, UFO_START_X, UFO_START_Y,
};
use crate::input::{Action, Controls};

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Score awarded per enemy destroyed.
pub fn score_for(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Squid => 10,
        EnemyKind::Crab => 20,
        EnemyKind::Octopus => 30,
        EnemyKind::Ufo => 100,
    }
}

/// Per-enemy fire probability for a given level, capped at certainty.
pub fn fire_chance(rules: &Rules, level: u32) -> f64 {
    (rules.enemy_fire_base + f64::from(level) * rules.enemy_fire_per_level).clamp(0.0, 1.0)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state shown on the title screen.
pub fn init_state(rules: Rules) -> GameState {
    GameState {
        player: Player {
            x: (FRAME_WIDTH - SPRITE_SIZE) / 2,
            vx: 0,
        },
        player_bullet: None,
        enemies: Vec::new(),
        enemy_bullets: Vec::new(),
        death_anims: Vec::new(),
        ufo: None,
        mode: GameMode::Start,
        score: 0,
        lives: rules.initial_lives,
        level: 0,
        frame: 0,
        rules,
    }
}

/// Reset every mutable value for a fresh game and drop straight into play.
pub fn restart(state: &GameState) -> GameState {
    info!("restarting game (previous score {})", state.score);
    GameState {
        mode: GameMode::Playing,
        ..init_state(state.rules)
    }
}

/// The full formation: one line per `FORMATION_ROWS` entry, 11 columns each.
pub fn spawn_wave() -> Vec<Enemy> {
    FORMATION_ROWS
        .iter()
        .enumerate()
        .flat_map(|(row, &kind)| {
            (0..FORMATION_COLUMNS).map(move |col| Enemy {
                x: FORMATION_LEFT + col as i32 * COLUMN_SPACING,
                y: FORMATION_TOP + row as i32 * ROW_SPACING,
                vx: ENEMY_STEP,
                vy: 0,
                kind,
                frame: 0,
            })
        })
        .collect()
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameState) -> GameState {
    if state.player.x <= 0 {
        return state.clone();
    }
    GameState {
        player: Player {
            vx: state.player.vx - PLAYER_STEP,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameState) -> GameState {
    if state.player.x + SPRITE_SIZE >= FRAME_WIDTH {
        return state.clone();
    }
    GameState {
        player: Player {
            vx: state.player.vx + PLAYER_STEP,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire from the player's position; ignored while a shot is in flight.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.player_bullet.is_some() {
        return state.clone();
    }
    GameState {
        player_bullet: Some(PlayerBullet {
            x: state.player.x,
            y: PLAYER_Y + MUZZLE_OFFSET,
            vy: -PLAYER_BULLET_SPEED,
        }),
        ..state.clone()
    }
}

/// Apply the pending movement and clear it.
pub fn apply_player_velocity(state: &GameState) -> GameState {
    GameState {
        player: Player {
            x: state.player.x + state.player.vx,
            vx: 0,
        },
        ..state.clone()
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    let mode = match state.mode {
        GameMode::Playing => GameMode::Paused,
        GameMode::Paused => GameMode::Playing,
        other => other,
    };
    info!("mode {:?} -> {:?}", state.mode, mode);
    GameState {
        mode,
        ..state.clone()
    }
}

// ── Projectiles & effects ────────────────────────────────────────────────────

pub fn update_player_bullet(state: &GameState) -> GameState {
    let player_bullet = state
        .player_bullet
        .as_ref()
        .map(|b| PlayerBullet {
            y: b.y + b.vy,
            ..b.clone()
        })
        .filter(|b| b.y >= 0);
    GameState {
        player_bullet,
        ..state.clone()
    }
}

pub fn update_enemy_bullets(state: &GameState) -> GameState {
    let enemy_bullets = state
        .enemy_bullets
        .iter()
        .map(|b| EnemyBullet {
            y: b.y + b.vy,
            ..b.clone()
        })
        .filter(|b| b.y <= FRAME_HEIGHT)
        .collect();
    GameState {
        enemy_bullets,
        ..state.clone()
    }
}

pub fn update_death_anims(state: &GameState) -> GameState {
    let death_anims = state
        .death_anims
        .iter()
        .map(|a| DeathAnimation {
            frame: a.frame + 1,
            ..a.clone()
        })
        .filter(|a| a.frame <= DEATH_ANIMATION_FRAMES)
        .collect();
    GameState {
        death_anims,
        ..state.clone()
    }
}

// ── Formation ────────────────────────────────────────────────────────────────

/// Advance the formation by one tick: respawn when cleared, reverse at the
/// walls, move, animate, and roll enemy fire.
pub fn update_formation(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut level = state.level;
    let mut enemies = if state.enemies.is_empty() {
        level += 1;
        info!("spawned wave on level {}", level);
        spawn_wave()
    } else {
        state.enemies.clone()
    };

    // Detect boundary contact first; velocities change once for the whole
    // formation, right wall winning over left.
    let hit_right = enemies.iter().any(|e| e.x > FRAME_WIDTH - SPRITE_SIZE);
    let hit_left = enemies.iter().any(|e| e.x <= 0);
    let reversal = if hit_right {
        Some(-ENEMY_STEP)
    } else if hit_left {
        Some(ENEMY_STEP)
    } else {
        None
    };
    if let Some(vx) = reversal {
        for enemy in enemies.iter_mut() {
            enemy.vx = vx;
            enemy.y += ROW_DROP;
        }
    }

    let chance = fire_chance(&state.rules, level);
    let mut enemy_bullets = state.enemy_bullets.clone();
    let mut mode = state.mode;

    for enemy in enemies.iter_mut() {
        if rng.gen_bool(chance) {
            debug!("enemy at ({}, {}) fires", enemy.x, enemy.y);
            enemy_bullets.push(EnemyBullet {
                x: enemy.x,
                y: enemy.y + SPRITE_SIZE / 2,
                vy: ENEMY_BULLET_SPEED,
            });
        }
        enemy.frame += 1;
        if enemy.frame > ANIMATION_PERIOD {
            enemy.frame = 0;
        }
        enemy.x += enemy.vx;
        enemy.y += enemy.vy;
        if enemy.y >= PLAYER_Y && mode != GameMode::GameOver {
            info!("formation reached the player row on frame {}", state.frame);
            mode = GameMode::GameOver;
        }
    }

    GameState {
        enemies,
        enemy_bullets,
        level,
        mode,
        ..state.clone()
    }
}

/// Spawn, move or retire the bonus UFO.
pub fn update_ufo(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut ufo = state.ufo.clone();
    if ufo.is_none() && rng.gen_bool(state.rules.ufo_spawn_chance) {
        info!("UFO spawned");
        ufo = Some(Enemy {
            x: UFO_START_X,
            y: UFO_START_Y,
            vx: UFO_SPEED,
            vy: 0,
            kind: EnemyKind::Ufo,
            frame: 0,
        });
    }
    let ufo = ufo.and_then(|u| {
        if u.x > FRAME_WIDTH {
            None
        } else {
            Some(Enemy { x: u.x + u.vx, ..u })
        }
    });
    GameState {
        ufo,
        ..state.clone()
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Exact-row hit test: the bullet must sit on the target's row and within
/// `HIT_HALF_WIDTH` of its x.  Every speed and row offset is a multiple of 4,
/// so a bullet always lands on each row it crosses.
pub fn hits(bullet_x: i32, bullet_y: i32, target_x: i32, target_y: i32) -> bool {
    bullet_y == target_y
        && bullet_x >= target_x - HIT_HALF_WIDTH
        && bullet_x <= target_x + HIT_HALF_WIDTH
}

/// Player bullet ↔ formation.  At most one enemy dies since the shot is
/// consumed by the first hit.
pub fn resolve_enemy_hit(state: &GameState) -> GameState {
    let bullet = match &state.player_bullet {
        Some(b) => b,
        None => return state.clone(),
    };
    let victim = state
        .enemies
        .iter()
        .position(|e| hits(bullet.x, bullet.y, e.x, e.y));
    let index = match victim {
        Some(i) => i,
        None => return state.clone(),
    };

    let enemy = &state.enemies[index];
    let score = state.score + score_for(enemy.kind);
    info!("{:?} hit, score {}", enemy.kind, score);

    let mut death_anims = state.death_anims.clone();
    death_anims.push(DeathAnimation {
        x: enemy.x,
        y: enemy.y,
        frame: 0,
    });
    let enemies = state
        .enemies
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, e)| e.clone())
        .collect();

    GameState {
        enemies,
        death_anims,
        player_bullet: None,
        score,
        ..state.clone()
    }
}

pub fn resolve_ufo_hit(state: &GameState) -> GameState {
    let (bullet, ufo) = match (&state.player_bullet, &state.ufo) {
        (Some(b), Some(u)) => (b, u),
        _ => return state.clone(),
    };
    if !hits(bullet.x, bullet.y, ufo.x, ufo.y) {
        return state.clone();
    }

    let score = state.score + score_for(EnemyKind::Ufo);
    info!("UFO hit, score {}", score);
    let mut death_anims = state.death_anims.clone();
    death_anims.push(DeathAnimation {
        x: ufo.x,
        y: ufo.y,
        frame: 0,
    });
    GameState {
        ufo: None,
        player_bullet: None,
        death_anims,
        score,
        ..state.clone()
    }
}

/// Enemy bullets ↔ player.  Every bullet on the player is consumed, but a
/// tick costs at most one life.
pub fn resolve_player_hit(state: &GameState) -> GameState {
    let player_x = state.player.x;
    let (hitting, enemy_bullets): (Vec<EnemyBullet>, Vec<EnemyBullet>) = state
        .enemy_bullets
        .iter()
        .cloned()
        .partition(|b| hits(b.x, b.y, player_x, PLAYER_Y));
    if hitting.is_empty() {
        return state.clone();
    }

    let lives = state.lives.saturating_sub(1);
    info!("player hit on frame {}, lives left {}", state.frame, lives);
    let mode = if lives == 0 {
        info!("mode {:?} -> {:?}", state.mode, GameMode::GameOver);
        GameMode::GameOver
    } else {
        state.mode
    };

    GameState {
        enemy_bullets,
        lives,
        mode,
        ..state.clone()
    }
}

// ── Per-frame update (RNG and controls are injected) ──────────────────────

/// One Playing tick: intents, movement, spawns, then collisions.
pub fn tick(state: &GameState, controls: &impl Controls, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    if controls.is_held(Action::MoveRight) {
        next = move_player_right(&next);
    }
    if controls.is_held(Action::MoveLeft) {
        next = move_player_left(&next);
    }
    if controls.is_held(Action::Fire) {
        next = player_shoot(&next);
    }

    let next = apply_player_velocity(&next);
    let next = update_player_bullet(&next);
    let next = update_formation(&next, rng);
    let next = update_ufo(&next, rng);
    let next = update_enemy_bullets(&next);
    let next = update_death_anims(&next);
    let next = resolve_enemy_hit(&next);
    let next = resolve_player_hit(&next);
    let next = resolve_ufo_hit(&next);

    GameState {
        frame: state.frame + 1,
        ..next
    }
}

/// Advance the game by one frame according to its mode.  Only `Playing`
/// simulates; the other modes wait for their press-edge.
pub fn update(state: &GameState, controls: &impl Controls, rng: &mut impl Rng) -> GameState {
    match state.mode {
        GameMode::GameOver => {
            if controls.just_pressed(Action::Restart) {
                restart(state)
            } else {
                state.clone()
            }
        }
        GameMode::Start => {
            if controls.just_pressed(Action::Confirm) {
                info!("mode {:?} -> {:?}", state.mode, GameMode::Playing);
                GameState {
                    mode: GameMode::Playing,
                    ..state.clone()
                }
            } else {
                state.clone()
            }
        }
        GameMode::Playing | GameMode::Paused => {
            let next = if controls.just_pressed(Action::Pause) {
                toggle_pause(state)
            } else {
                state.clone()
            };
            if next.mode == GameMode::Playing {
                tick(&next, controls, rng)
            } else {
                next
            }
        }
    }
}
