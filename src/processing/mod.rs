//! Processing module for file selection validation.
//!
//! This module provides:
//! - The individual size, extension and count stages
//! - The pipeline that runs them in order and assembles the partition

pub mod filter;
pub mod pipeline;

pub use filter::{count_stage, extension_stage, size_stage, SizeOutcome, StageOutcome};
pub use pipeline::{validate, ValidationPipeline};
