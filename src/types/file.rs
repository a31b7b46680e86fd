//! File metadata types.

use serde::{Deserialize, Serialize};

/// Metadata the validation pipeline needs from a candidate file.
///
/// Implemented by [`SelectedFile`], but any host-side file handle that can
/// report a name and a byte size can be validated directly.
pub trait FileMetadata {
    /// File name, used for extension extraction.
    fn name(&self) -> &str;

    /// File size in bytes.
    fn size(&self) -> u64;

    /// Lower-cased text after the last `.` in the name.
    ///
    /// Returns `None` when the name has no `.` at all.
    fn extension(&self) -> Option<String> {
        lower_case_extension(self.name())
    }
}

/// A file picked through the native file chooser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedFile {
    /// File name as reported by the chooser
    pub name: String,

    /// Size in bytes
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl FileMetadata for SelectedFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }
}

impl<T: FileMetadata + ?Sized> FileMetadata for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Extract the lower-cased extension of a file name.
pub fn lower_case_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    Some(ext.to_lowercase())
}
