//! Individual validation stages.
//!
//! Each stage takes the survivors of the previous one and splits them into
//! files that pass and files it rejects, keeping input order on both sides.

use crate::types::{ExtensionFilter, FileMetadata};

/// Files that passed a stage and files it rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome<F> {
    pub valid: Vec<F>,
    pub rejected: Vec<F>,
}

impl<F> StageOutcome<F> {
    fn pass_all(files: Vec<F>) -> Self {
        Self {
            valid: files,
            rejected: Vec::new(),
        }
    }
}

/// Result of the size stage, which rejects for two different reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeOutcome<F> {
    pub valid: Vec<F>,
    pub too_small: Vec<F>,
    pub too_big: Vec<F>,
}

/// Reject files outside `[min_size, max_size]`. Zero disables a bound.
///
/// The minimum is checked first, so with `min_size > max_size` a file that
/// violates both bounds is reported as too small.
pub fn size_stage<F: FileMetadata>(files: Vec<F>, min_size: u64, max_size: u64) -> SizeOutcome<F> {
    if min_size == 0 && max_size == 0 {
        return SizeOutcome {
            valid: files,
            too_small: Vec::new(),
            too_big: Vec::new(),
        };
    }

    let mut outcome = SizeOutcome {
        valid: Vec::with_capacity(files.len()),
        too_small: Vec::new(),
        too_big: Vec::new(),
    };

    for file in files {
        let size = file.size();
        if min_size > 0 && size < min_size {
            outcome.too_small.push(file);
        } else if max_size > 0 && size > max_size {
            outcome.too_big.push(file);
        } else {
            outcome.valid.push(file);
        }
    }

    outcome
}

/// Reject files whose extension fails the filter.
pub fn extension_stage<F: FileMetadata>(
    files: Vec<F>,
    filter: Option<&ExtensionFilter>,
) -> StageOutcome<F> {
    let filter = match filter {
        Some(f) if !f.is_empty() => f,
        _ => return StageOutcome::pass_all(files),
    };

    let (valid, rejected): (Vec<F>, Vec<F>) = files
        .into_iter()
        .partition(|file| filter.accepts(file.extension().as_deref()));

    StageOutcome { valid, rejected }
}

/// Keep the first `max_count` files and reject the rest. Zero means no limit.
pub fn count_stage<F>(mut files: Vec<F>, max_count: usize) -> StageOutcome<F> {
    if max_count == 0 || files.len() <= max_count {
        return StageOutcome::pass_all(files);
    }

    let rejected = files.split_off(max_count);
    StageOutcome {
        valid: files,
        rejected,
    }
}
