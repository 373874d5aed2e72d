//! Terminal key events mapped into logical `Key` values.

use core_keys::Key;
use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent};

/// Map a crossterm key event into a logical key.
///
/// Returns `None` for key codes the modal layer does not consume (function
/// keys, media keys, bare modifiers, navigation keys without a binding).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<Key> {
    map_key_code(&event.code)
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<Key> {
    let key = match code {
        CKeyCode::Char(c) => Key::Char(*c),
        CKeyCode::Esc => Key::Esc,
        CKeyCode::Enter => Key::Enter,
        CKeyCode::Backspace => Key::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => Key::Tab,
        CKeyCode::Up => Key::Up,
        CKeyCode::Down => Key::Down,
        CKeyCode::Left => Key::Left,
        CKeyCode::Right => Key::Right,
        _ => return None,
    };
    Some(key)
}
