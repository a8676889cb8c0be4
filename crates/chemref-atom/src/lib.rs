//! Atomic datasets: the periodic table and AutoDock atom types.
//!
//! The accessors in this crate read files from the `atom` data category
//! through a [`chemref_store::Loader`]. The periodic-table parquet file is
//! produced by the update pipeline (`chemref-update`); the AutoDock atom
//! types and the Blue Obelisk van-der-Waals radii are small curated JSON
//! files bundled with the repository.

use std::sync::Arc;

use chemref_model::Result;
use chemref_store::{LoadOptions, Loader};
use polars::prelude::DataFrame;

pub mod autodock;
pub mod normalize;
pub mod radii;

pub use autodock::autodock_atom_types;
pub use normalize::{group_of, normalize_periodic_table, period_of};
pub use radii::VdwRadii;

/// Data category of this crate's files.
pub const CATEGORY: &str = "atom";

/// Dataset name of the periodic-table parquet file.
pub const PERIODIC_TABLE: &str = "periodic_table";

/// Get the periodic table of chemical elements.
///
/// One row per element 1–118, sorted by atomic number, in the 20-column
/// published schema (see [`normalize::OUTPUT_COLUMNS`]). The table is
/// cached after the first load; the returned handle is shared immutable.
pub fn periodic_table(loader: &Loader) -> Result<Arc<DataFrame>> {
    loader.load_table(CATEGORY, PERIODIC_TABLE, LoadOptions::default())
}
