//! File store and cached loader for the bundled chemref datasets.
//!
//! Data files live under `{root}/{category}/{name}.{ext}`. The
//! [`DataStore`] resolves names to paths, the [`TableCache`] retains loaded
//! tables for cheap repeat access, and the [`Loader`] ties the two together
//! and owns parsing (parquet tables, JSON documents).

pub mod cache;
pub mod loader;
pub mod paths;
pub mod store;

pub use cache::TableCache;
pub use loader::{LoadOptions, Loader};
pub use store::{DataStore, FileFormat};
