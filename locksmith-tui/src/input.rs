//! Password field editing

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Character drawn in place of each input character while masked
pub const MASK_CHAR: char = '•';

/// What a key press did to the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Text changed and must be re-analyzed
    Edited,
    ToggledMask,
    Quit,
    Ignored,
}

/// Single-line password field. Starts masked.
#[derive(Clone, PartialEq, Eq)]
pub struct InputState {
    text: String,
    masked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            masked: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text as it should appear on screen
    pub fn display(&self) -> String {
        if self.masked {
            std::iter::repeat(MASK_CHAR)
                .take(self.text.chars().count())
                .collect()
        } else {
            self.text.clone()
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('c') if ctrl => InputAction::Quit,
            KeyCode::Char('u') if ctrl => {
                if self.text.is_empty() {
                    InputAction::Ignored
                } else {
                    self.text.clear();
                    InputAction::Edited
                }
            }
            KeyCode::Char(_) if ctrl => InputAction::Ignored,
            KeyCode::Char(c) => {
                self.text.push(c);
                InputAction::Edited
            }
            KeyCode::Backspace => {
                if self.text.pop().is_some() {
                    InputAction::Edited
                } else {
                    InputAction::Ignored
                }
            }
            KeyCode::Tab => {
                self.masked = !self.masked;
                InputAction::ToggledMask
            }
            _ => InputAction::Ignored,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputState")
            .field("len", &self.text.chars().count())
            .field("masked", &self.masked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn typed(text: &str) -> InputState {
        let mut input = InputState::new();
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = typed("abc");
        assert_eq!(input.text(), "abc");

        assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputAction::Edited);
        assert_eq!(input.text(), "ab");

        input.handle_key(key(KeyCode::Backspace));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputAction::Ignored);
        assert!(input.is_empty());
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = typed("hunter2");
        assert_eq!(input.handle_key(ctrl('u')), InputAction::Edited);
        assert!(input.is_empty());
        assert_eq!(input.handle_key(ctrl('u')), InputAction::Ignored);
    }

    #[test]
    fn test_quit_keys() {
        let mut input = typed("x");
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputAction::Quit);
        assert_eq!(input.handle_key(ctrl('c')), InputAction::Quit);
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_other_control_chords_are_not_typed() {
        let mut input = typed("x");
        assert_eq!(input.handle_key(ctrl('a')), InputAction::Ignored);
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn test_masking() {
        let mut input = typed("pässword");
        assert!(input.is_masked());
        assert_eq!(input.display(), "••••••••");

        assert_eq!(input.handle_key(key(KeyCode::Tab)), InputAction::ToggledMask);
        assert_eq!(input.display(), "pässword");
    }

    #[test]
    fn test_debug_hides_text() {
        let input = typed("secret");
        let debug = format!("{input:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("len: 6"));
    }
}
