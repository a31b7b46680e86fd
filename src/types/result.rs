//! Partition result types.

use std::collections::BTreeMap;

use serde::Serialize;

/// Why a file was rejected.
///
/// Each reason belongs to exactly one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectionReason {
    /// Larger than the maximum size
    TooBig,
    /// Smaller than the minimum size
    TooSmall,
    /// Extension not allowed (or denied)
    BadExtension,
    /// Beyond the maximum file count
    TooMany,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 4] = [
        RejectionReason::TooBig,
        RejectionReason::TooSmall,
        RejectionReason::BadExtension,
        RejectionReason::TooMany,
    ];

    /// Key used in the serialized result.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::TooBig => "tooBig",
            RejectionReason::TooSmall => "tooSmall",
            RejectionReason::BadExtension => "badExtension",
            RejectionReason::TooMany => "tooMany",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected files grouped by reason.
///
/// A reason is only present when at least one file was rejected for it.
/// Serializes as `{"count": N, "tooBig": [...], ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidFiles<F> {
    count: usize,
    #[serde(flatten)]
    by_reason: BTreeMap<RejectionReason, Vec<F>>,
}

impl<F> InvalidFiles<F> {
    /// No rejections; `{count: 0}`.
    pub fn empty() -> Self {
        Self {
            count: 0,
            by_reason: BTreeMap::new(),
        }
    }

    /// Record the files a stage rejected. Empty lists are dropped.
    pub fn record(&mut self, reason: RejectionReason, files: Vec<F>) {
        if files.is_empty() {
            return;
        }
        self.count += files.len();
        self.by_reason.entry(reason).or_default().extend(files);
    }

    /// Total number of rejected files across all reasons.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Files rejected for `reason`, or `None` if there were none.
    pub fn get(&self, reason: RejectionReason) -> Option<&[F]> {
        self.by_reason.get(&reason).map(Vec::as_slice)
    }

    pub fn contains(&self, reason: RejectionReason) -> bool {
        self.by_reason.contains_key(&reason)
    }

    /// Reasons that rejected at least one file, in stable order.
    pub fn reasons(&self) -> impl Iterator<Item = RejectionReason> + '_ {
        self.by_reason.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RejectionReason, &[F])> + '_ {
        self.by_reason.iter().map(|(r, files)| (*r, files.as_slice()))
    }
}

impl<F> Default for InvalidFiles<F> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Output of the validation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionResult<F> {
    /// Accepted files, in input order
    pub valid: Vec<F>,

    /// Rejected files by reason, each list in input order
    pub invalid: InvalidFiles<F>,
}

impl<F> PartitionResult<F> {
    /// Total number of files that went in.
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.count()
    }

    /// Whether every file was accepted.
    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

impl<F> Default for PartitionResult<F> {
    fn default() -> Self {
        Self {
            valid: Vec::new(),
            invalid: InvalidFiles::empty(),
        }
    }
}
