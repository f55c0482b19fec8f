use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use space_invaders::input::*;

fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
}

fn press(code: KeyCode) -> KeyEvent {
    key(code, KeyEventKind::Press)
}

// ── Key map ───────────────────────────────────────────────────────────────────

#[test]
fn movement_keys_map_to_directions() {
    assert_eq!(Action::for_key(KeyCode::Left), &[Action::MoveLeft]);
    assert_eq!(Action::for_key(KeyCode::Char('a')), &[Action::MoveLeft]);
    assert_eq!(Action::for_key(KeyCode::Right), &[Action::MoveRight]);
    assert_eq!(Action::for_key(KeyCode::Char('D')), &[Action::MoveRight]);
}

#[test]
fn space_fires_and_confirms() {
    let actions = Action::for_key(KeyCode::Char(' '));
    assert!(actions.contains(&Action::Fire));
    assert!(actions.contains(&Action::Confirm));
    assert_eq!(Action::for_key(KeyCode::Char('z')), &[Action::Fire]);
    assert_eq!(Action::for_key(KeyCode::Enter), &[Action::Confirm]);
    assert_eq!(Action::for_key(KeyCode::Char('p')), &[Action::Pause]);
    assert_eq!(Action::for_key(KeyCode::Char('R')), &[Action::Restart]);
    assert!(Action::for_key(KeyCode::Char('x')).is_empty());
}

// ── FrameInput ────────────────────────────────────────────────────────────────

#[test]
fn frame_input_pressed_implies_held() {
    let input = FrameInput::new().with_pressed(Action::Pause);
    assert!(input.just_pressed(Action::Pause));
    assert!(input.is_held(Action::Pause));
    assert!(!input.just_pressed(Action::Fire));
}

#[test]
fn frame_input_held_is_not_an_edge() {
    let input = FrameInput::new().with_held(Action::Fire);
    assert!(input.is_held(Action::Fire));
    assert!(!input.just_pressed(Action::Fire));
}

// ── KeyTracker ────────────────────────────────────────────────────────────────

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn first_press_is_an_edge() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.begin_frame(t0);
    keys.handle(&press(KeyCode::Char('p')));
    let input = keys.snapshot();
    assert!(input.just_pressed(Action::Pause));
    assert!(input.is_held(Action::Pause));
}

#[test]
fn held_key_reports_one_edge() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.begin_frame(t0);
    keys.handle(&press(KeyCode::Enter));
    assert!(keys.snapshot().just_pressed(Action::Confirm));

    // Classic terminals repeat as Press; kitty sends Repeat.  Neither is an edge.
    keys.begin_frame(t0 + ms(16));
    keys.handle(&press(KeyCode::Enter));
    let input = keys.snapshot();
    assert!(input.is_held(Action::Confirm));
    assert!(!input.just_pressed(Action::Confirm));

    keys.begin_frame(t0 + ms(32));
    keys.handle(&key(KeyCode::Enter, KeyEventKind::Repeat));
    let input = keys.snapshot();
    assert!(input.is_held(Action::Confirm));
    assert!(!input.just_pressed(Action::Confirm));
}

/// One physical hold on a classic terminal at 60 fps: a press, the OS
/// initial repeat delay, then auto-repeat presses every other frame.
#[test]
fn repeat_after_initial_delay_is_not_an_edge() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    let mut edges = 0;
    for frame in 0..120u64 {
        keys.begin_frame(t0 + ms(frame * 1000 / 60));
        if frame == 0 || (frame >= 30 && frame % 2 == 0) {
            keys.handle(&press(KeyCode::Char('p')));
        }
        if keys.snapshot().just_pressed(Action::Pause) {
            edges += 1;
        }
    }
    assert_eq!(edges, 1);
}

/// Fast OS repeat at a high frame rate keeps the key held on every frame.
#[test]
fn fast_repeat_at_high_fps_stays_held() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    let mut held = 0;
    let mut edges = 0;
    for frame in 0..80u64 {
        keys.begin_frame(t0 + Duration::from_micros(frame * 1_000_000 / 240));
        if frame % 8 == 0 {
            keys.handle(&press(KeyCode::Left));
        }
        let input = keys.snapshot();
        if input.is_held(Action::MoveLeft) {
            held += 1;
        }
        if input.just_pressed(Action::MoveLeft) {
            edges += 1;
        }
    }
    assert_eq!(held, 80);
    assert_eq!(edges, 1);
}

#[test]
fn release_then_press_is_a_new_edge() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.begin_frame(t0);
    keys.handle(&press(KeyCode::Char('r')));
    keys.snapshot();

    keys.begin_frame(t0 + ms(16));
    keys.handle(&key(KeyCode::Char('r'), KeyEventKind::Release));
    assert!(!keys.snapshot().is_held(Action::Restart));

    keys.begin_frame(t0 + ms(32));
    keys.handle(&press(KeyCode::Char('r')));
    assert!(keys.snapshot().just_pressed(Action::Restart));
}

#[test]
fn held_key_expires_after_hold_window() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.begin_frame(t0);
    keys.handle(&press(KeyCode::Left));
    keys.snapshot();

    keys.begin_frame(t0 + HOLD_WINDOW);
    assert!(keys.snapshot().is_held(Action::MoveLeft));
    keys.begin_frame(t0 + HOLD_WINDOW + ms(1));
    assert!(!keys.snapshot().is_held(Action::MoveLeft));
}

#[test]
fn press_after_long_silence_is_a_new_edge() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.begin_frame(t0);
    keys.handle(&press(KeyCode::Left));
    keys.snapshot();

    // Within the re-arm gap a press is still the same physical hold
    keys.begin_frame(t0 + REARM_GAP);
    keys.handle(&press(KeyCode::Left));
    assert!(!keys.snapshot().just_pressed(Action::MoveLeft));

    let later = t0 + REARM_GAP * 2 + ms(1);
    keys.begin_frame(later);
    keys.handle(&press(KeyCode::Left));
    assert!(keys.snapshot().just_pressed(Action::MoveLeft));
}

#[test]
fn edges_are_cleared_by_snapshot() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.begin_frame(t0);
    keys.handle(&press(KeyCode::Char(' ')));
    let first = keys.snapshot();
    assert!(first.just_pressed(Action::Fire));
    assert!(first.just_pressed(Action::Confirm));

    keys.begin_frame(t0 + ms(16));
    let second = keys.snapshot();
    assert!(!second.just_pressed(Action::Fire));
    assert!(second.is_held(Action::Fire));
}
