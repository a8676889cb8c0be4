//! Periodic-table update pipeline.

use std::path::PathBuf;

use chemref_atom::{PERIODIC_TABLE, VdwRadii, normalize_periodic_table};
use chemref_model::Result;
use chemref_store::Loader;
use tracing::info;

use crate::fetch::{PERIODIC_TABLE_URL, fetch_text};
use crate::persist::write_parquet;

/// Regenerate the periodic-table parquet file from the upstream export.
pub fn update_periodic_table(loader: &Loader) -> Result<PathBuf> {
    let csv_text = fetch_text(PERIODIC_TABLE_URL)?;
    update_periodic_table_from_csv(loader, &csv_text)
}

/// Regenerate the periodic-table parquet file from already-obtained CSV
/// text. The bundled van-der-Waals radii are joined in during
/// normalization, so the radii file must be present.
pub fn update_periodic_table_from_csv(loader: &Loader, csv_text: &str) -> Result<PathBuf> {
    let radii = VdwRadii::load(loader)?;
    let mut table = normalize_periodic_table(csv_text, &radii)?;
    let path = write_parquet(loader, chemref_atom::CATEGORY, PERIODIC_TABLE, &mut table)?;
    info!(rows = table.height(), "periodic table updated");
    Ok(path)
}
