//! Core types for the file input control.

mod config;
mod file;
mod policy;
mod result;

pub use config::{
    decode_byte_count, decode_count, decode_extensions, decode_flag, decode_idle_timeout,
    FileInputAttributes, FileInputConfig, ServiceConfig,
};
pub use file::{lower_case_extension, FileMetadata, SelectedFile};
pub use policy::{ExtensionFilter, ValidationPolicy};
pub use result::{InvalidFiles, PartitionResult, RejectionReason};
