use crossterm::event::{Event, KeyEvent};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Outcome of a key press in the add-symbol input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Text edited or cursor moved
    Edited,
    /// Enter pressed; carries the text, the input is already cleared
    Submit(String),
    Cancel,
    Ignored,
}

/// Single-line text input for `SYMBOL [NAME...]`
#[derive(Debug, Default)]
pub struct SymbolInput {
    input: Input,
}

impl SymbolInput {
    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn visual_cursor(&self) -> usize {
        self.input.visual_cursor()
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> InputAction {
        match event {
            key!(Esc) => {
                self.input.reset();
                InputAction::Cancel
            }
            key!(Enter) => {
                let text = self.input.value().to_string();
                self.input.reset();
                InputAction::Submit(text)
            }
            _ => {
                if self.input.handle_event(&Event::Key(event)).is_some() {
                    InputAction::Edited
                } else {
                    InputAction::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn type_text(input: &mut SymbolInput, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut input = SymbolInput::default();
        type_text(&mut input, "aapl Apple");
        assert_eq!(input.value(), "aapl Apple");

        let action = input.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, InputAction::Submit("aapl Apple".to_string()));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn esc_cancels_and_clears() {
        let mut input = SymbolInput::default();
        type_text(&mut input, "msft");

        let action = input.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(action, InputAction::Cancel);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn backspace_edits() {
        let mut input = SymbolInput::default();
        type_text(&mut input, "tslx");
        let action = input.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(action, InputAction::Edited);
        assert_eq!(input.value(), "tsl");
        assert_eq!(input.visual_cursor(), 3);
    }
}
