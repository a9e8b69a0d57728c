//! Form field descriptors
//!
//! The draft owned by the session holds the values; a `FormField` only knows
//! how a key press turns the current value into the next one.

use crate::state::DraftField;

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    /// Digits and a single decimal point
    Number,
    /// `YYYY-MM-DDTHH:MM` typed by hand
    DateTime,
    /// Cycled through a fixed option list
    Choice,
}

/// Represents a single form field with its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub field: DraftField,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    pub fn for_draft(field: DraftField) -> Self {
        let kind = match field {
            DraftField::Note => FieldKind::Multiline,
            DraftField::PetAge => FieldKind::Number,
            DraftField::AppointmentTime => FieldKind::DateTime,
            f if f.is_choice() => FieldKind::Choice,
            _ => FieldKind::Text,
        };
        Self {
            field,
            label: field.label(),
            kind,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.kind == FieldKind::Multiline
    }

    /// Value after typing `c`, or `None` if the key does not apply
    pub fn push_char(&self, current: &str, c: char) -> Option<String> {
        let accepted = match self.kind {
            FieldKind::Choice => false,
            FieldKind::Number => c.is_ascii_digit() || (c == '.' && !current.contains('.')),
            FieldKind::DateTime => c.is_ascii_digit() || matches!(c, '-' | ':' | 'T' | 't' | '.'),
            FieldKind::Text | FieldKind::Multiline => !c.is_control(),
        };
        if !accepted {
            return None;
        }
        let mut next = current.to_string();
        next.push(if self.kind == FieldKind::DateTime {
            c.to_ascii_uppercase()
        } else {
            c
        });
        Some(next)
    }

    /// Value after a newline, only meaningful for multiline fields
    pub fn push_newline(&self, current: &str) -> Option<String> {
        self.is_multiline().then(|| format!("{current}\n"))
    }

    /// Value after backspace, or `None` for choice fields
    pub fn pop_char(&self, current: &str) -> Option<String> {
        if self.kind == FieldKind::Choice {
            return None;
        }
        let mut next = current.to_string();
        next.pop();
        Some(next)
    }
}

/// Step through `options` from `current`, with the empty string standing for
/// "nothing selected" before the first option.
pub fn cycle_choice(options: &[&str], current: &str, forward: bool) -> String {
    let mut ring = Vec::with_capacity(options.len() + 1);
    ring.push("");
    ring.extend_from_slice(options);

    let position = ring.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (position + 1) % ring.len()
    } else if position == 0 {
        ring.len() - 1
    } else {
        position - 1
    };
    ring[next].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kinds() {
        assert_eq!(
            FormField::for_draft(DraftField::CustomerName).kind,
            FieldKind::Text
        );
        assert_eq!(FormField::for_draft(DraftField::Note).kind, FieldKind::Multiline);
        assert_eq!(FormField::for_draft(DraftField::PetAge).kind, FieldKind::Number);
        assert_eq!(
            FormField::for_draft(DraftField::AppointmentTime).kind,
            FieldKind::DateTime
        );
        for choice in [
            DraftField::VetDoctor,
            DraftField::PetGender,
            DraftField::PaymentMethod,
        ] {
            assert_eq!(FormField::for_draft(choice).kind, FieldKind::Choice);
        }
    }

    #[test]
    fn test_number_field_accepts_one_decimal_point() {
        let age = FormField::for_draft(DraftField::PetAge);
        assert_eq!(age.push_char("", '3'), Some("3".to_string()));
        assert_eq!(age.push_char("3", '.'), Some("3.".to_string()));
        assert_eq!(age.push_char("3.5", '.'), None);
        assert_eq!(age.push_char("3", '-'), None);
        assert_eq!(age.push_char("3", 'a'), None);
    }

    #[test]
    fn test_datetime_field_uppercases_separator() {
        let time = FormField::for_draft(DraftField::AppointmentTime);
        assert_eq!(time.push_char("2024-05-01", 't'), Some("2024-05-01T".to_string()));
        assert_eq!(time.push_char("2024", 'x'), None);
    }

    #[test]
    fn test_choice_fields_ignore_typing() {
        let gender = FormField::for_draft(DraftField::PetGender);
        assert_eq!(gender.push_char("", 'M'), None);
        assert_eq!(gender.pop_char("MALE"), None);
    }

    #[test]
    fn test_pop_char() {
        let name = FormField::for_draft(DraftField::PetName);
        assert_eq!(name.pop_char("Mo"), Some("M".to_string()));
        assert_eq!(name.pop_char(""), Some(String::new()));
    }

    #[test]
    fn test_newline_only_in_multiline() {
        let note = FormField::for_draft(DraftField::Note);
        let name = FormField::for_draft(DraftField::PetName);
        assert_eq!(note.push_newline("a"), Some("a\n".to_string()));
        assert_eq!(name.push_newline("a"), None);
    }

    #[test]
    fn test_cycle_choice_wraps_through_unselected() {
        let options = ["cash", "credit_card", "paypal"];
        assert_eq!(cycle_choice(&options, "", true), "cash");
        assert_eq!(cycle_choice(&options, "paypal", true), "");
        assert_eq!(cycle_choice(&options, "", false), "paypal");
        assert_eq!(cycle_choice(&options, "cash", false), "");
        assert_eq!(cycle_choice(&options, "stale", true), "cash");
    }

    #[test]
    fn test_cycle_choice_with_no_options() {
        assert_eq!(cycle_choice(&[], "", true), "");
        assert_eq!(cycle_choice(&[], "", false), "");
    }
}
