//! Shared types for the chemref workspace.
//!
//! This crate defines the error taxonomy, the closed enumeration of
//! supported CCD categories, the dictionary/partition variants, and the
//! problem record accumulated by the curation pipeline. All other chemref
//! crates depend on it; it depends on nothing but polars and serde.

pub mod category;
pub mod enums;
pub mod error;
pub mod problem;
pub mod value;

pub use category::CcdCategory;
pub use enums::{CcdPartition, DictVariant, GroupBlock, StandardState, VariantSelect};
pub use error::{DataError, Result};
pub use problem::{CategoryProblems, MergeConflict, ProblemRecord, ProblemStage, ValidationIssue};
