//! File Input Library
//!
//! A file selection control that filters what the user picked against a
//! declarative policy (size bounds, extension allow/deny list, maximum
//! count) and reports accepted and rejected files.

pub mod api;
pub mod control;
pub mod error;
pub mod processing;
pub mod types;

pub use control::{ChangeEvent, FileInputControl, Platform};
pub use error::ConfigError;
pub use processing::{validate, ValidationPipeline};
pub use types::{
    ExtensionFilter, FileInputConfig, FileMetadata, InvalidFiles, PartitionResult,
    RejectionReason, SelectedFile, ValidationPolicy,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::control::*;
    pub use crate::error::ConfigError;
    pub use crate::processing::{validate, ValidationPipeline};
    pub use crate::types::*;
}

/// Message reported by a required control with no accepted files
pub const DEFAULT_INVALID_TEXT: &str = "No valid files selected.";

/// `accept` value that opens the camera on iOS
pub const IOS_CAMERA_ACCEPT: &str = "image/*;capture=camera";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3017;

/// Hosted controls unused for this long are dropped (1 hour)
pub const DEFAULT_CONTROL_IDLE_SECS: u64 = 60 * 60;

/// Longest idle timeout accepted from configuration (30 days)
pub const MAX_CONTROL_IDLE_SECS: u64 = 30 * 24 * 60 * 60;
