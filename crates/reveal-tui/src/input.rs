use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    Replay,
    ToggleImmediate,
    None,
}

/// Map a key press to an action
///
/// `pending_key` is the first key of an unfinished sequence such as "gg".
pub fn handle_key_event(key: KeyEvent, pending_key: Option<char>, keymap: &Keymap) -> Action {
    // Terminals disagree on whether uppercase letters carry SHIFT
    let modifiers = match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => key.modifiers | KeyModifiers::SHIFT,
        _ => key.modifiers,
    };
    let binding = KeyBinding::new(key.code, modifiers);

    if keymap.is_g_prefix(&binding) {
        return if pending_key == Some('g') {
            keymap.get_pending_g_action().copied().unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_basic_keys() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(press(KeyCode::Char('j'), KeyModifiers::NONE), None, &keymap),
            Action::ScrollDown
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL), None, &keymap),
            Action::Quit
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('z'), KeyModifiers::NONE), None, &keymap),
            Action::None
        );
    }

    #[test]
    fn test_gg_sequence() {
        let keymap = Keymap::default();
        let g = press(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(handle_key_event(g, None, &keymap), Action::PendingG);
        assert_eq!(handle_key_event(g, Some('g'), &keymap), Action::JumpToTop);
    }

    #[test]
    fn test_uppercase_without_shift_flag() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(press(KeyCode::Char('G'), KeyModifiers::NONE), None, &keymap),
            Action::JumpToBottom
        );
        assert_eq!(
            handle_key_event(press(KeyCode::Char('G'), KeyModifiers::SHIFT), None, &keymap),
            Action::JumpToBottom
        );
    }
}
