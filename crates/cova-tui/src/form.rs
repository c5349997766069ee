//! Editable form state shared by the booking, order and account tabs.
//!
//! Focus moves through the fields and then onto the submit button, which
//! sits at index `fields.len()`.

/// Maximum length for free text input.
/// 200 chars covers addresses and notes without letting the layout blow up.
const MAX_TEXT_LENGTH: usize = 200;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub required: bool,
    pub masked: bool,
}

impl FormField {
    pub fn text(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            value: String::new(),
            required: false,
            masked: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    fn max_len(&self) -> usize {
        if self.masked {
            MAX_PASSWORD_LENGTH
        } else {
            MAX_TEXT_LENGTH
        }
    }

    /// The value as shown on screen, starred out if masked
    pub fn display_value(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    pub fn clear_value(&mut self, index: usize) {
        self.set_value(index, String::new());
    }

    pub fn on_button(&self) -> bool {
        self.focus == self.fields.len()
    }

    /// Move to the next field, wrapping from the button back to the top
    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn prev_field(&mut self) {
        let slots = self.fields.len() + 1;
        self.focus = (self.focus + slots - 1) % slots;
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if can_add_char(field.value.chars().count(), field.max_len(), c) {
                field.value.push(c);
                self.error = None;
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }
}

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState::new(vec![
            FormField::text("Email", "Email").required(),
            FormField::text("Password", "Password").required().masked(),
        ])
    }

    #[test]
    fn test_focus_wraps_through_button() {
        let mut form = form();
        assert_eq!(form.focus, 0);
        form.next_field();
        form.next_field();
        assert!(form.on_button());
        form.next_field();
        assert_eq!(form.focus, 0);
        form.prev_field();
        assert!(form.on_button());
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut form = form();
        form.push_char('a');
        form.push_char('\n');
        form.next_field();
        form.push_char('p');
        form.push_char('w');
        form.pop_char();
        assert_eq!(form.value(0), "a");
        assert_eq!(form.value(1), "p");
        assert_eq!(form.fields[1].display_value(), "*");

        // Typing on the button does nothing
        form.next_field();
        form.push_char('x');
        assert_eq!(form.value(1), "p");
    }

    #[test]
    fn test_typing_clears_error() {
        let mut form = form();
        form.error = Some("Email is required".to_string());
        form.push_char('a');
        assert_eq!(form.error, None);
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, 10, 'a'));
        assert!(!can_add_char(10, 10, 'a'));
        assert!(!can_add_char(0, 10, '\t'));
        assert!(!can_add_char(0, 10, '\x00'));
    }
}
