use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::assets::SpriteRegistry;
use space_invaders::compute::{init_state, update};
use space_invaders::config::Config;
use space_invaders::display::{enter_screen, leave_screen, Renderer, TerminalCanvas};
use space_invaders::entities::Rules;
use space_invaders::error::LaunchError;
use space_invaders::input::KeyTracker;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(author, version, about = "Space Invaders in the terminal", long_about = None)]
struct Cli {
    /// TOML config file (defaults to ./invaders.toml when present).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// TOML sprite sheet replacing the built-in glyphs.
    #[arg(long, value_name = "PATH")]
    sprites: Option<PathBuf>,
    /// Seed for enemy fire and UFO spawns.
    #[arg(long)]
    seed: Option<u64>,
    /// Frames per second.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: Option<u32>,
    /// Lives at the start of each game.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    lives: Option<u32>,
    /// Write log output to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// File settings with command-line overrides applied.
fn settings(cli: &Cli) -> Result<Config, LaunchError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.sprites {
        config.sprites = Some(path.clone());
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(lives) = cli.lives {
        config.rules.initial_lives = lives;
    }
    if let Some(path) = &cli.log_file {
        config.log_file = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

/// The game owns the terminal, so logs only go to a file unless `RUST_LOG`
/// explicitly asks for stderr.
fn init_logging(log_file: Option<&Path>) -> Result<(), LaunchError> {
    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| LaunchError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
                .init();
        }
    }
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  One `update` and one `render` per frame.
fn game_loop<W: Write>(
    canvas: &mut TerminalCanvas<W>,
    renderer: &Renderer,
    rx: &mpsc::Receiver<Event>,
    rules: Rules,
    fps: u32,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
    let mut state = init_state(rules);
    let mut keys = KeyTracker::new();

    loop {
        let frame_start = Instant::now();
        keys.begin_frame(frame_start);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && is_quit(&key) {
                        info!("quit with score {} after {} frames", state.score, state.frame);
                        return Ok(());
                    }
                    keys.handle(&key);
                }
                Event::Resize(cols, rows) => canvas.resize(cols, rows),
                _ => {}
            }
        }

        let input = keys.snapshot();
        state = update(&state, &input, rng);
        renderer.render(canvas, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), LaunchError> {
    let cli = Cli::parse();
    let config = settings(&cli)?;
    init_logging(config.log_file.as_deref())?;
    match &config.loaded_from {
        Some(path) => info!("loaded config {}", path.display()),
        None => info!("no config file, using defaults"),
    }

    // Sprites must exist before the first frame; a bad sheet aborts here.
    let sprites = match &config.sprites {
        Some(path) => SpriteRegistry::load(path)?,
        None => SpriteRegistry::builtin(),
    };
    let renderer = Renderer::new(sprites);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (cols, rows) = terminal::size()?;
    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    if let Err(e) = enter_screen(&mut out) {
        leave_screen(&mut out);
        let _ = terminal::disable_raw_mode();
        return Err(e.into());
    }

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let mut canvas = TerminalCanvas::new(out, cols, rows);
    let result = game_loop(
        &mut canvas,
        &renderer,
        &rx,
        config.rules,
        config.fps,
        &mut rng,
    );

    // Always restore the terminal
    let mut out = canvas.into_inner();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    leave_screen(&mut out);
    let _ = terminal::disable_raw_mode();

    result.map_err(LaunchError::from)
}
