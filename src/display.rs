/// Rendering layer: all terminal I/O lives here.
///
/// `Renderer` translates an immutable view of the game state into
/// `Canvas` calls.  No game logic is performed; the canvas decides how the
/// logical 640×480 playfield maps onto its surface.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::{Sprite, SpriteId, SpriteRegistry};
use crate::entities::{
    Enemy, EnemyKind, GameMode, GameState, ANIMATION_PERIOD, FRAME_HEIGHT, FRAME_WIDTH, PLAYER_Y,
    SPRITE_SIZE,
};

const C_TEXT: Color = Color::White;

// ── Canvas ────────────────────────────────────────────────────────────────────

/// Drawing collaborator.  Positions are logical playfield coordinates.
pub trait Canvas {
    fn clear(&mut self) -> std::io::Result<()>;
    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32) -> std::io::Result<()>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> std::io::Result<()>;
    /// Flush everything drawn since `clear`.
    fn present(&mut self) -> std::io::Result<()>;
}

/// A canvas backed by a crossterm writer, scaled to `cols` × `rows` cells.
pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self { out, cols, rows }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Terminal cell for a logical position, or `None` when off-screen.
    pub fn cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if !(0..FRAME_WIDTH).contains(&x) || !(0..FRAME_HEIGHT).contains(&y) {
            return None;
        }
        let col = x as i64 * self.cols as i64 / FRAME_WIDTH as i64;
        let row = y as i64 * self.rows as i64 / FRAME_HEIGHT as i64;
        Some((col as u16, row as u16))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print `text` at a cell, cutting it at the right edge.
    fn print_clipped(&mut self, text: &str, col: u16, row: u16) -> std::io::Result<()> {
        if row >= self.rows || col >= self.cols {
            return Ok(());
        }
        let room = (self.cols - col) as usize;
        let visible: String = text.chars().take(room).collect();
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32) -> std::io::Result<()> {
        let (col, row) = match self.cell(x, y) {
            Some(cell) => cell,
            None => return Ok(()),
        };
        self.out.queue(style::SetForegroundColor(sprite.color))?;
        for (i, line) in sprite.rows.iter().enumerate() {
            self.print_clipped(line, col, row.saturating_add(i as u16))?;
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> std::io::Result<()> {
        let (col, row) = match self.cell(x.max(0), y) {
            Some(cell) => cell,
            None => return Ok(()),
        };
        self.out.queue(style::SetForegroundColor(C_TEXT))?;
        self.print_clipped(text, col, row)
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

/// Switch to the alternate screen and hide the cursor.
pub fn enter_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::EnterAlternateScreen)?;
    out.queue(cursor::Hide)?;
    out.flush()
}

/// Undo `enter_screen`, best effort.  Every step runs even if an earlier one
/// fails, so a half-initialised terminal is still put back.
pub fn leave_screen<W: Write>(out: &mut W) {
    let _ = out.queue(style::ResetColor);
    let _ = out.queue(cursor::Show);
    let _ = out.queue(terminal::LeaveAlternateScreen);
    let _ = out.flush();
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub const START_MESSAGE: &str = "Press SPACE to Start";
pub const PAUSE_MESSAGE: &str = "Game Paused. Press P to Resume";
pub const GAME_OVER_MESSAGE: &str = "Game Over! Press R to Restart";

pub struct Renderer {
    sprites: SpriteRegistry,
}

impl Renderer {
    pub fn new(sprites: SpriteRegistry) -> Self {
        Self { sprites }
    }

    /// Sprite for a formation member, alternating halfway through its
    /// animation period.
    pub fn enemy_sprite(enemy: &Enemy) -> SpriteId {
        let alt = enemy.frame >= ANIMATION_PERIOD / 2;
        match (enemy.kind, alt) {
            (EnemyKind::Squid, false) => SpriteId::Squid,
            (EnemyKind::Squid, true) => SpriteId::Squid2,
            (EnemyKind::Crab, false) => SpriteId::Crab,
            (EnemyKind::Crab, true) => SpriteId::Crab2,
            (EnemyKind::Octopus, false) => SpriteId::Octopus,
            (EnemyKind::Octopus, true) => SpriteId::Octopus2,
            (EnemyKind::Ufo, _) => SpriteId::Ufo,
        }
    }

    /// Render one complete frame.
    pub fn render(&self, canvas: &mut impl Canvas, state: &GameState) -> std::io::Result<()> {
        canvas.clear()?;
        match state.mode {
            GameMode::Start => {
                canvas.draw_text(START_MESSAGE, FRAME_WIDTH / 2 - 80, FRAME_HEIGHT / 2)?;
            }
            GameMode::Paused => {
                canvas.draw_text(PAUSE_MESSAGE, FRAME_WIDTH / 2 - 120, FRAME_HEIGHT / 2)?;
            }
            GameMode::GameOver => {
                canvas.draw_text(GAME_OVER_MESSAGE, FRAME_WIDTH / 2 - 120, FRAME_HEIGHT / 2)?;
                let score_line = format!("Final Score: {}", state.score);
                canvas.draw_text(&score_line, FRAME_WIDTH / 2 - 60, FRAME_HEIGHT / 2 + 40)?;
            }
            GameMode::Playing => self.draw_playfield(canvas, state)?,
        }
        canvas.present()
    }

    fn draw_playfield(&self, canvas: &mut impl Canvas, state: &GameState) -> std::io::Result<()> {
        canvas.draw_sprite(self.sprites.get(SpriteId::Player), state.player.x, PLAYER_Y)?;
        if let Some(bullet) = &state.player_bullet {
            canvas.draw_sprite(self.sprites.get(SpriteId::Bullet), bullet.x, bullet.y)?;
        }
        for enemy in &state.enemies {
            canvas.draw_sprite(self.sprites.get(Self::enemy_sprite(enemy)), enemy.x, enemy.y)?;
        }
        for anim in &state.death_anims {
            canvas.draw_sprite(self.sprites.get(SpriteId::Death), anim.x, anim.y)?;
        }
        if let Some(ufo) = &state.ufo {
            canvas.draw_sprite(self.sprites.get(SpriteId::Ufo), ufo.x, ufo.y)?;
        }
        for bullet in &state.enemy_bullets {
            canvas.draw_sprite(self.sprites.get(SpriteId::Bullet), bullet.x, bullet.y)?;
        }
        self.draw_hud(canvas, state)
    }

    fn draw_hud(&self, canvas: &mut impl Canvas, state: &GameState) -> std::io::Result<()> {
        canvas.draw_text(&format!("Score: {}", state.score), 10, 10)?;
        canvas.draw_text(&format!("Level: {}", state.level), FRAME_WIDTH - 120, 10)?;
        // One ship icon per remaining life
        for i in 0..state.lives as i32 {
            canvas.draw_sprite(
                self.sprites.get(SpriteId::Player),
                16 + i * SPRITE_SIZE,
                FRAME_HEIGHT - 30,
            )?;
        }
        Ok(())
    }
}
