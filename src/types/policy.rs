//! Validation policy types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Extension allow list, or deny list when `negate` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionFilter {
    /// Lower-cased extensions without the leading dot
    pub extensions: BTreeSet<String>,

    /// Reject matching files instead of accepting them
    #[serde(default)]
    pub negate: bool,
}

impl ExtensionFilter {
    /// Create an allow list.
    pub fn allow<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
            negate: false,
        }
    }

    /// Create a deny list.
    pub fn deny<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            negate: true,
            ..Self::allow(extensions)
        }
    }

    /// An empty set filters nothing.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Whether a file with the given extension survives the filter.
    ///
    /// A missing extension never matches the set, so it is rejected by an
    /// allow list and accepted by a deny list.
    pub fn accepts(&self, extension: Option<&str>) -> bool {
        let matched = extension.is_some_and(|ext| self.extensions.contains(ext));
        matched != self.negate
    }
}

/// Rules applied to a file selection.
///
/// Zero for a numeric field disables that rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Minimum size in bytes
    pub min_size: u64,

    /// Maximum size in bytes
    pub max_size: u64,

    /// Extension filter
    pub extensions: Option<ExtensionFilter>,

    /// Maximum number of accepted files
    pub max_count: usize,
}

impl ValidationPolicy {
    /// A policy that accepts everything.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Set both size bounds.
    pub fn with_size_bounds(mut self, min_size: u64, max_size: u64) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Set the minimum size.
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum size.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the extension filter.
    pub fn with_extensions(mut self, filter: ExtensionFilter) -> Self {
        self.extensions = Some(filter);
        self
    }

    /// Set the maximum file count.
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn has_size_bounds(&self) -> bool {
        self.min_size > 0 || self.max_size > 0
    }

    /// The configured extension filter, if it filters anything.
    pub fn extension_filter(&self) -> Option<&ExtensionFilter> {
        self.extensions.as_ref().filter(|f| !f.is_empty())
    }

    /// `min_size > max_size` rejects every file. Valid input, just useless.
    pub fn is_degenerate(&self) -> bool {
        self.min_size > 0 && self.max_size > 0 && self.min_size > self.max_size
    }
}
