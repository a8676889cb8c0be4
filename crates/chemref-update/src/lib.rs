//! Update pipelines for the bundled datasets.
//!
//! Each pipeline downloads an upstream source (behind the `fetch`
//! feature), transforms it into the published schema, and writes the
//! result into the data directory through the store. Accessors never
//! regenerate data on their own; [`ensure_ccd`] is the explicit bridge
//! for callers that want a missing file produced on first use.

use chemref_model::Result;
use chemref_store::Loader;

pub mod atom;
pub mod fetch;
pub mod pdb;
pub mod persist;

pub use atom::{update_periodic_table, update_periodic_table_from_csv};
pub use pdb::{CcdUpdateReport, ensure_ccd, update_ccd, update_ccd_from_text};

/// Run every update pipeline in sequence.
pub fn update_all(loader: &Loader) -> Result<()> {
    update_periodic_table(loader)?;
    update_ccd(loader)?;
    Ok(())
}
