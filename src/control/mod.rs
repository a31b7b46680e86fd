//! Host-side file input control.

mod file_input;
mod native;
mod platform;
mod store;
mod validity;

pub use file_input::{ChangeEvent, ControlSnapshot, FileInputControl};
pub use native::NativeInput;
pub use platform::Platform;
pub use store::{ControlRecord, ControlStore};
pub use validity::ValidationTarget;
