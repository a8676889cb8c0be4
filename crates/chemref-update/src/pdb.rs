//! CCD update pipeline: download, parse, curate, persist.

use std::path::PathBuf;

use chemref_model::{CcdPartition, DataError, ProblemRecord, Result};
use chemref_pdb::mmcif::parse_dictionary;
use chemref_pdb::{CcdLookup, CcdQuery, ccd, curate_ccd, dataset_name};
use chemref_store::Loader;
use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::fetch::{CCD_MAIN_URL, CCD_PROTONATION_URL, fetch_gz_text};
use crate::persist::{write_json, write_parquet};

/// Dataset name of the persisted curation diagnostics.
pub const PROBLEMS_DATASET: &str = "ccd-curation-problems";

/// Files written by one CCD update, plus the curation diagnostics.
#[derive(Debug)]
pub struct CcdUpdateReport {
    pub written: Vec<PathBuf>,
    pub problems: ProblemRecord,
}

/// Regenerate every CCD parquet file from the upstream dictionaries.
pub fn update_ccd(loader: &Loader) -> Result<CcdUpdateReport> {
    let main_text = fetch_gz_text(CCD_MAIN_URL)?;
    let protonation_text = fetch_gz_text(CCD_PROTONATION_URL)?;
    update_ccd_from_text(loader, &main_text, &protonation_text)
}

/// Regenerate the CCD parquet files from already-obtained dictionary text.
///
/// All category/partition tables are written, the per-run diagnostics are
/// persisted as a JSON summary next to them, and any prior diagnostics
/// file from a clean run is superseded.
pub fn update_ccd_from_text(
    loader: &Loader,
    main_text: &str,
    protonation_text: &str,
) -> Result<CcdUpdateReport> {
    let main = parse_dictionary(main_text)?;
    let protonation = parse_dictionary(protonation_text)?;
    let curated = curate_ccd(main, protonation)?;

    let mut written = Vec::new();
    for partition in CcdPartition::ALL {
        for (category, df) in curated.partition(partition) {
            let mut df = df.clone();
            let name = dataset_name(*category, partition);
            written.push(write_parquet(loader, chemref_pdb::CATEGORY, &name, &mut df)?);
        }
    }

    let problems = curated.problems;
    let summary = serde_json::to_value(problems.summary())
        .map_err(|err| DataError::data_quality(PROBLEMS_DATASET, err.to_string()))?;
    written.push(write_json(
        loader,
        chemref_pdb::CATEGORY,
        PROBLEMS_DATASET,
        &summary,
    )?);
    if problems.is_empty() {
        info!(files = written.len(), "CCD updated with no findings");
    } else {
        warn!(
            files = written.len(),
            findings = problems.issue_count(),
            "CCD updated with curation findings"
        );
    }
    Ok(CcdUpdateReport { written, problems })
}

/// Resolve a CCD query, running the update pipeline once if the backing
/// file is absent.
///
/// This is the one place regeneration is tied to access, and it is
/// explicit: plain [`ccd`] reports a missing file and stops.
pub fn ensure_ccd(loader: &Loader, query: &CcdQuery) -> Result<DataFrame> {
    match ccd(loader, query)? {
        CcdLookup::Found(df) => Ok(df),
        CcdLookup::Missing {
            category,
            partition,
        } => {
            info!(%category, %partition, "CCD file missing, running update");
            update_ccd(loader)?;
            ccd(loader, query)?.into_table(loader)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemref_model::{CcdCategory, VariantSelect};
    use chemref_store::DataStore;

    const MAIN: &str = "\
data_ATP
_chem_comp.id ATP
_chem_comp.name \"ADENOSINE-5'-TRIPHOSPHATE\"
data_ALA
_chem_comp.id ALA
_chem_comp.name ALANINE
";

    const PROTONATION: &str = "\
data_ALA
_chem_comp.id ALA
_chem_comp.name ALANINE
";

    #[test]
    fn test_update_writes_both_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new(DataStore::new(dir.path()));

        let report = update_ccd_from_text(&loader, MAIN, PROTONATION).unwrap();
        // chem_comp in both partitions plus the diagnostics file.
        assert_eq!(report.written.len(), 3);
        assert!(report.problems.is_empty());

        let aa = ccd(
            &loader,
            &CcdQuery::new(CcdCategory::ChemComp).with_variant(VariantSelect::Aa),
        )
        .unwrap()
        .into_table(&loader)
        .unwrap();
        assert_eq!(aa.height(), 1);

        let non_aa = ccd(
            &loader,
            &CcdQuery::new(CcdCategory::ChemComp).with_variant(VariantSelect::NonAa),
        )
        .unwrap()
        .into_table(&loader)
        .unwrap();
        assert_eq!(non_aa.height(), 1);
    }

    #[cfg(not(feature = "fetch"))]
    #[test]
    fn test_ensure_without_fetch_reports_missing_capability() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new(DataStore::new(dir.path()));
        let query = CcdQuery::new(CcdCategory::ChemComp).with_variant(VariantSelect::Aa);
        let err = ensure_ccd(&loader, &query).unwrap_err();
        assert!(matches!(
            err,
            chemref_model::DataError::MissingDependency { .. }
        ));
    }

    #[test]
    fn test_diagnostics_summary_is_persisted_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new(DataStore::new(dir.path()));

        // A repeated ALA block yields a duplicate-row finding.
        let duplicated = format!("{MAIN}data_ALA\n_chem_comp.id ALA\n_chem_comp.name ALANINE\n");
        let report = update_ccd_from_text(&loader, &duplicated, PROTONATION).unwrap();
        assert!(!report.problems.is_empty());

        let summary = loader
            .load_json(chemref_pdb::CATEGORY, PROBLEMS_DATASET)
            .unwrap();
        let entries = summary.as_array().unwrap();
        assert!(!entries.is_empty());
        assert_eq!(entries[0]["duplicate_rows"], 1);
    }

    #[test]
    fn test_ensure_returns_existing_table_without_update() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new(DataStore::new(dir.path()));
        update_ccd_from_text(&loader, MAIN, PROTONATION).unwrap();

        let query = CcdQuery::new(CcdCategory::ChemComp).with_variant(VariantSelect::NonAa);
        let df = ensure_ccd(&loader, &query).unwrap();
        assert_eq!(df.height(), 1);
    }
}
