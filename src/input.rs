/// Logical input actions and the per-frame controls snapshot.
///
/// The simulation only ever asks two questions: is an action held right now,
/// and was it pressed this frame.  `KeyTracker` answers them from raw
/// crossterm key events.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
    Confirm,
    Restart,
}

impl Action {
    /// Actions bound to a key.  Space is both fire and confirm; the current
    /// mode decides which one matters.
    pub fn for_key(code: KeyCode) -> &'static [Action] {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => &[Action::MoveLeft],
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => &[Action::MoveRight],
            KeyCode::Char('z') | KeyCode::Char('Z') => &[Action::Fire],
            KeyCode::Char(' ') => &[Action::Fire, Action::Confirm],
            KeyCode::Enter => &[Action::Confirm],
            KeyCode::Char('p') | KeyCode::Char('P') => &[Action::Pause],
            KeyCode::Char('r') | KeyCode::Char('R') => &[Action::Restart],
            _ => &[],
        }
    }
}

/// Input collaborator queried by the simulation.
pub trait Controls {
    /// True while the action's key is down.
    fn is_held(&self, action: Action) -> bool;
    /// True only on the frame the action went from released to pressed.
    fn just_pressed(&self, action: Action) -> bool;
}

/// An immutable snapshot of one frame's input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_held(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    /// A fresh press also counts as held for this frame.
    pub fn with_pressed(mut self, action: Action) -> Self {
        self.pressed.insert(action);
        self.held.insert(action);
        self
    }
}

impl Controls for FrameInput {
    fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

// ── Key tracking ──────────────────────────────────────────────────────────────

/// An action is considered "held" if its last press/repeat event arrived
/// within this window.  Covers terminals that don't emit key-release
/// events: OS key-repeat refreshes the entry before it expires.
pub const HOLD_WINDOW: Duration = Duration::from_millis(130);

/// On terminals without release events, a `Press` only starts a new
/// physical press after this much silence.  Longer than the usual OS
/// initial repeat delay, so the first auto-repeat is never an edge.
pub const REARM_GAP: Duration = Duration::from_millis(750);

/// Folds crossterm key events into held / press-edge state, frame by frame.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): `Press` / `Repeat` /
///   `Release` events, so actions are dropped on release.
/// * **Classic terminals**: only `Press` events, with OS key-repeat showing up
///   as repeated presses.  A press counts as an edge only after `REARM_GAP`
///   of silence, so a held key fires `just_pressed` once.
///
/// Timing is wall-clock, so behaviour does not depend on the frame rate.
#[derive(Debug)]
pub struct KeyTracker {
    /// Each recently seen action → when its last press or repeat arrived.
    last_seen: HashMap<Action, Instant>,
    /// Edges collected since the last snapshot.
    pressed: HashSet<Action>,
    now: Instant,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            last_seen: HashMap::new(),
            pressed: HashSet::new(),
            now: Instant::now(),
        }
    }

    /// Start a new frame at `now`; must be called before feeding that
    /// frame's events.
    pub fn begin_frame(&mut self, now: Instant) {
        self.now = now;
        self.last_seen
            .retain(|_, &mut last| now.saturating_duration_since(last) <= REARM_GAP);
    }

    pub fn handle(&mut self, event: &KeyEvent) {
        for &action in Action::for_key(event.code) {
            match event.kind {
                KeyEventKind::Press => {
                    if self.silent_for(action) > REARM_GAP {
                        self.pressed.insert(action);
                    }
                    self.last_seen.insert(action, self.now);
                }
                KeyEventKind::Repeat => {
                    self.last_seen.insert(action, self.now);
                }
                KeyEventKind::Release => {
                    self.last_seen.remove(&action);
                }
            }
        }
    }

    /// Time since the action's last event; unbounded when never seen or
    /// released.
    fn silent_for(&self, action: Action) -> Duration {
        self.last_seen
            .get(&action)
            .map(|&last| self.now.saturating_duration_since(last))
            .unwrap_or(Duration::MAX)
    }

    /// Snapshot the current frame and clear the collected edges.
    pub fn snapshot(&mut self) -> FrameInput {
        let mut input = FrameInput::new();
        for &action in self.last_seen.keys() {
            if self.silent_for(action) <= HOLD_WINDOW {
                input = input.with_held(action);
            }
        }
        for action in self.pressed.drain() {
            input = input.with_pressed(action);
        }
        input
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}
