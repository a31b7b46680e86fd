//! State of the native file chooser wrapped by a control.

use serde::Serialize;

/// Attributes mirrored onto the native `<input type="file">`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NativeInput {
    /// Forwarded `accept` value
    pub accept: String,

    /// Multiple selection allowed
    pub multiple: bool,

    /// Directory selection enabled
    pub directory: bool,

    /// Number of times the chooser was cleared
    pub resets: u64,
}

impl NativeInput {
    /// Multiple selection is on unless exactly one file is allowed.
    pub fn set_max_files(&mut self, max_files: usize) {
        self.multiple = max_files != 1;
    }

    /// Directory selection only turns on if the platform supports it.
    pub fn set_directory(&mut self, requested: bool, supported: bool) {
        self.directory = requested && supported;
    }

    pub fn set_accept(&mut self, accept: &str) {
        self.accept = accept.to_string();
    }

    /// Clear the chooser's current selection.
    pub fn clear(&mut self) {
        self.resets += 1;
    }
}
