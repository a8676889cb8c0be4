//! PDB Chemical Component Dictionary (CCD) tables.
//!
//! The curated CCD is persisted as one parquet file per category and
//! partition (`ccd-{category}-{aa|non_aa}.parquet`) under the `pdb` data
//! category. [`ccd`] reads those files; [`curate::curate_ccd`] produces
//! them from the two upstream dictionaries (the full CCD and the
//! amino-acid protonation-variants companion dictionary).

use chemref_model::{CcdCategory, CcdPartition, DataError, Result, VariantSelect};
use chemref_store::{LoadOptions, Loader};
use polars::prelude::{DataFrame, Expr, col, lit};

pub mod curate;
pub mod mmcif;
pub mod schema;

pub use curate::{CuratedCcd, curate_ccd};

/// Data category of this crate's files.
pub const CATEGORY: &str = "pdb";

/// Persisted dataset name for one category/partition pair.
pub fn dataset_name(category: CcdCategory, partition: CcdPartition) -> String {
    format!("ccd-{}-{}", category.name(), partition.file_suffix())
}

/// Resolve a category name given by the caller, e.g. from a CLI argument.
pub fn category_from_name(name: &str) -> Result<CcdCategory> {
    CcdCategory::from_name(name).ok_or_else(|| {
        DataError::input("category", name, "not a supported CCD category")
    })
}

/// A CCD table request.
#[derive(Debug, Clone)]
pub struct CcdQuery {
    pub category: CcdCategory,
    pub variant: VariantSelect,
    /// Component ids to filter by, matched case-insensitively against the
    /// category's identity column. When set, rows are filtered during the
    /// parquet scan instead of materializing the whole table.
    pub component_ids: Option<Vec<String>>,
}

impl CcdQuery {
    pub fn new(category: CcdCategory) -> Self {
        Self {
            category,
            variant: VariantSelect::default(),
            component_ids: None,
        }
    }

    pub fn with_variant(mut self, variant: VariantSelect) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_component_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.component_ids = Some(ids.into_iter().collect());
        self
    }
}

/// Outcome of a CCD lookup.
///
/// A missing data file is a state the caller decides how to handle (most
/// run the update pipeline once, see `chemref-update`), not an error; the
/// accessor itself never triggers regeneration.
#[derive(Debug)]
pub enum CcdLookup {
    Found(DataFrame),
    Missing {
        category: CcdCategory,
        partition: CcdPartition,
    },
}

impl CcdLookup {
    /// Unwrap a found table, converting `Missing` into [`DataError::NotFound`].
    pub fn into_table(self, loader: &Loader) -> Result<DataFrame> {
        match self {
            CcdLookup::Found(df) => Ok(df),
            CcdLookup::Missing {
                category,
                partition,
            } => {
                let name = dataset_name(category, partition);
                Err(DataError::NotFound {
                    category: CATEGORY.to_string(),
                    name: name.clone(),
                    path: loader.store().path_for(
                        CATEGORY,
                        &name,
                        chemref_store::FileFormat::Parquet,
                    ),
                })
            }
        }
    }
}

/// Get a table from the curated Chemical Component Dictionary.
///
/// Partitions are tried in the order given by the query's variant
/// selection (`aa` before `non_aa` for [`VariantSelect::Any`]); with a
/// component-id filter, the first partition yielding a non-empty result
/// wins. An unfiltered [`VariantSelect::Any`] request is ambiguous and is
/// rejected with an input error.
pub fn ccd(loader: &Loader, query: &CcdQuery) -> Result<CcdLookup> {
    if query.variant == VariantSelect::Any && query.component_ids.is_none() {
        return Err(DataError::input(
            "variant",
            "any",
            "requires a comp_id filter; pass component ids or select an explicit variant",
        ));
    }

    let mut last_empty: Option<DataFrame> = None;
    for partition in query.variant.partitions() {
        let name = dataset_name(query.category, *partition);
        let options = match &query.component_ids {
            Some(ids) => {
                LoadOptions::default().with_filter(component_filter(query.category, ids))
            }
            None => LoadOptions::default(),
        };
        match loader.load_table(CATEGORY, &name, options) {
            Ok(df) => {
                if df.height() > 0 || query.component_ids.is_none() {
                    return Ok(CcdLookup::Found(df.as_ref().clone()));
                }
                last_empty = Some(df.as_ref().clone());
            }
            Err(DataError::NotFound { .. }) => {
                return Ok(CcdLookup::Missing {
                    category: query.category,
                    partition: *partition,
                });
            }
            Err(other) => return Err(other),
        }
    }

    // Every partition loaded but none matched the filter.
    Ok(CcdLookup::Found(last_empty.unwrap_or_default()))
}

/// Case-insensitive identity-column filter for a set of component ids.
fn component_filter(category: CcdCategory, ids: &[String]) -> Expr {
    let id_col = col(category.id_column()).str().to_lowercase();
    ids.iter()
        .map(|id| id_col.clone().eq(lit(id.to_lowercase())))
        .reduce(|a, b| a.or(b))
        .unwrap_or_else(|| lit(false))
}
