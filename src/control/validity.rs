//! Per-control validity reporting for required inputs.

use serde::Serialize;

/// Companion target that carries the custom validity message of one
/// required control.
///
/// Owned by its control and dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationTarget {
    message: String,
}

impl ValidationTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validity message; an empty message means valid.
    pub fn set_custom_validity(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_valid(&self) -> bool {
        self.message.is_empty()
    }

    /// Valid while there are accepted files, otherwise `invalid_text`.
    pub fn update(&mut self, has_files: bool, invalid_text: &str) {
        if has_files {
            self.set_custom_validity("");
        } else {
            self.set_custom_validity(invalid_text);
        }
    }
}
