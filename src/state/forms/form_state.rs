//! Form navigation state for the appointment form

use super::field::FormField;
use crate::state::DraftField;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Buttons on the last row of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormButton {
    #[default]
    Submit,
    Cancel,
}

impl FormButton {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Submit => Self::Cancel,
            Self::Cancel => Self::Submit,
        };
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submit => "Book appointment",
            Self::Cancel => "Close",
        }
    }
}

/// Cursor over the appointment form: one row per draft field plus the
/// buttons row at the end.
#[derive(Debug, Clone)]
pub struct AppointmentForm {
    pub fields: Vec<FormField>,
    pub active_field_index: usize,
    pub selected_button: FormButton,
}

impl AppointmentForm {
    pub fn new() -> Self {
        Self {
            fields: DraftField::ALL.into_iter().map(FormField::for_draft).collect(),
            active_field_index: 0,
            selected_button: FormButton::default(),
        }
    }

    /// Index of the buttons row
    pub fn buttons_row(&self) -> usize {
        self.fields.len()
    }

    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == self.buttons_row()
    }

    /// Field under the cursor, `None` on the buttons row
    pub fn active(&self) -> Option<&FormField> {
        self.fields.get(self.active_field_index)
    }

    /// Move the cursor to a specific draft field
    pub fn focus(&mut self, field: DraftField) {
        if let Some(index) = self.fields.iter().position(|f| f.field == field) {
            self.active_field_index = index;
        }
    }
}

impl Default for AppointmentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for AppointmentForm {
    fn field_count(&self) -> usize {
        self.fields.len() + 1
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.buttons_row());
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.fields.get(index)
    }
}
