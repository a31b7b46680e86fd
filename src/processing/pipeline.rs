//! The file selection validation pipeline.
//!
//! Applies the size, extension and count stages in that fixed order. Later
//! stages only see the survivors of earlier ones, so the stage that rejects
//! a file decides its category.

use tracing::debug;

use crate::processing::filter::{count_stage, extension_stage, size_stage};
use crate::types::{FileMetadata, InvalidFiles, PartitionResult, RejectionReason, ValidationPolicy};

/// Partition `files` into accepted and rejected-by-reason sets.
///
/// Pure: the input is only read, and identical input always yields an
/// identical result. An empty input gives an empty result with `count == 0`.
pub fn validate<F>(files: &[F], policy: &ValidationPolicy) -> PartitionResult<F>
where
    F: FileMetadata + Clone,
{
    let size = size_stage(files.to_vec(), policy.min_size, policy.max_size);
    let extension = extension_stage(size.valid, policy.extension_filter());
    let count = count_stage(extension.valid, policy.max_count);

    let mut invalid = InvalidFiles::empty();
    invalid.record(RejectionReason::TooBig, size.too_big);
    invalid.record(RejectionReason::TooSmall, size.too_small);
    invalid.record(RejectionReason::BadExtension, extension.rejected);
    invalid.record(RejectionReason::TooMany, count.rejected);

    debug!(
        total = files.len(),
        valid = count.valid.len(),
        invalid = invalid.count(),
        "Validated file selection"
    );

    PartitionResult {
        valid: count.valid,
        invalid,
    }
}

/// A validation policy bound to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ValidationPipeline {
    policy: ValidationPolicy,
}

impl ValidationPipeline {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Run the pipeline over `files`.
    pub fn validate<F>(&self, files: &[F]) -> PartitionResult<F>
    where
        F: FileMetadata + Clone,
    {
        validate(files, &self.policy)
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }
}
