//! CCD curation: validate, deduplicate, merge, and partition the two
//! source dictionaries into the persisted category tables.
//!
//! The pipeline is best-effort past its provenance gate. Block/id
//! mismatches abort the run with an integrity error; everything after
//! that (schema findings, duplicate rows, merge conflicts) is collected
//! into a [`ProblemRecord`] and the run continues.

use std::collections::{BTreeMap, BTreeSet};

use chemref_model::value::{column_value_string, composite_key};
use chemref_model::{
    CcdCategory, CcdPartition, DataError, DictVariant, MergeConflict, ProblemRecord, Result,
};
use polars::frame::DataFrame;
use polars::functions::concat_df_diagonal;
use polars::prelude::{BooleanChunked, NamedFrom, NewChunkedArray, Series, SortMultipleOptions};
use tracing::{debug, warn};

use crate::mmcif::{BLOCK_COLUMN, CategoryTables};
use crate::schema::{ESD_SUFFIX, validate_category};

/// The curated dictionary: one table per category and partition, plus the
/// diagnostics accumulated while producing them.
#[derive(Debug)]
pub struct CuratedCcd {
    pub aa: BTreeMap<CcdCategory, DataFrame>,
    pub non_aa: BTreeMap<CcdCategory, DataFrame>,
    pub problems: ProblemRecord,
}

impl CuratedCcd {
    pub fn partition(&self, partition: CcdPartition) -> &BTreeMap<CcdCategory, DataFrame> {
        match partition {
            CcdPartition::AminoAcid => &self.aa,
            CcdPartition::NonAminoAcid => &self.non_aa,
        }
    }
}

/// Curate the parsed main and protonation-variant dictionaries.
///
/// Components present in the protonation dictionary's `chem_comp` table
/// define the amino-acid partition; every other component lands in the
/// non-amino-acid partition. Where both dictionaries carry a row with the
/// same identity key, the main dictionary's values win and differing
/// cells are recorded as merge conflicts.
pub fn curate_ccd(main: CategoryTables, protonation: CategoryTables) -> Result<CuratedCcd> {
    let mut problems = ProblemRecord::new();
    let main = prepare_variant(DictVariant::Main, main, &mut problems)?;
    let protonation = prepare_variant(DictVariant::Protonation, protonation, &mut problems)?;

    let aa_ids = component_ids(&protonation)?;
    debug!(amino_acids = aa_ids.len(), "amino-acid partition ids collected");

    let mut aa = BTreeMap::new();
    let mut non_aa = BTreeMap::new();
    for category in CcdCategory::ALL {
        let merged = match (main.get(&category), protonation.get(&category)) {
            (None, None) => continue,
            (Some(main_df), None) => {
                dedupe_single(DictVariant::Main, category, main_df, &mut problems)?
            }
            (None, Some(proto_df)) => {
                dedupe_single(DictVariant::Protonation, category, proto_df, &mut problems)?
            }
            (Some(main_df), Some(proto_df)) => {
                let key = identity_columns(category, Some((main_df, proto_df)))?;
                let (main_df, proto_df) = dedupe_variants(
                    category,
                    &key,
                    main_df,
                    proto_df,
                    &mut problems,
                )?;
                merge_variants(category, &key, &main_df, &proto_df, &mut problems)?
            }
        };
        let key = identity_columns(category, None)
            .unwrap_or_else(|_| vec![category.id_column().to_string()]);
        let sorted = sort_by_key(&merged, &key)?;
        let (aa_df, non_aa_df) = partition_by_ids(category, &sorted, &aa_ids)?;
        aa.insert(category, aa_df);
        non_aa.insert(category, non_aa_df);
    }

    Ok(CuratedCcd {
        aa,
        non_aa,
        problems,
    })
}

/// Per-variant preparation: provenance gate, schema validation, removal of
/// estimated-standard-deviation columns, and bond direction normalization.
fn prepare_variant(
    variant: DictVariant,
    tables: CategoryTables,
    problems: &mut ProblemRecord,
) -> Result<BTreeMap<CcdCategory, DataFrame>> {
    let mut prepared = BTreeMap::new();
    for (name, df) in tables {
        let Some(category) = CcdCategory::from_name(&name) else {
            warn!(category = %name, %variant, "skipping unsupported category");
            continue;
        };
        let df = check_block_provenance(variant, category, df)?;
        let (df, issues) = validate_category(category, &df)?;
        if !issues.is_empty() {
            warn!(%variant, %category, count = issues.len(), "schema validation issues");
        }
        problems.record_validation(variant, category, issues);
        let df = strip_esd_columns(df);
        let df = if category == CcdCategory::ChemCompBond {
            normalize_bond_order(&df)?
        } else {
            df
        };
        prepared.insert(category, df);
    }
    Ok(prepared)
}

/// Verify that every row's block code equals its component id, then drop
/// the provenance column. A mismatch means the source file is corrupt or
/// mis-parsed, so this is the one fatal check of the pipeline.
fn check_block_provenance(
    variant: DictVariant,
    category: CcdCategory,
    df: DataFrame,
) -> Result<DataFrame> {
    let id_column = category.id_column();
    let mut mismatches = 0;
    for idx in 0..df.height() {
        let block = column_value_string(&df, BLOCK_COLUMN, idx);
        let id = column_value_string(&df, id_column, idx);
        if !block.eq_ignore_ascii_case(&id) {
            mismatches += 1;
        }
    }
    if mismatches > 0 {
        return Err(DataError::Integrity {
            category: category.name().to_string(),
            variant,
            id_column,
            mismatches,
        });
    }
    Ok(df.drop(BLOCK_COLUMN)?)
}

fn strip_esd_columns(df: DataFrame) -> DataFrame {
    let esd: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .filter(|name| name.ends_with(ESD_SUFFIX))
        .map(str::to_string)
        .collect();
    if esd.is_empty() {
        return df;
    }
    let mut out = df;
    for name in esd {
        // Column existence was just established.
        out = out.drop(&name).unwrap_or(out);
    }
    out
}

/// Rewrite each bond so `atom_id_1 <= atom_id_2`, making bonds
/// direction-independent before keys are built.
fn normalize_bond_order(df: &DataFrame) -> Result<DataFrame> {
    let a1 = df.column("atom_id_1")?.str()?.clone();
    let a2 = df.column("atom_id_2")?.str()?.clone();
    let mut first: Vec<Option<String>> = Vec::with_capacity(df.height());
    let mut second: Vec<Option<String>> = Vec::with_capacity(df.height());
    for (left, right) in (&a1).into_iter().zip(&a2) {
        match (left, right) {
            (Some(l), Some(r)) if l > r => {
                first.push(Some(r.to_string()));
                second.push(Some(l.to_string()));
            }
            (l, r) => {
                first.push(l.map(str::to_string));
                second.push(r.map(str::to_string));
            }
        }
    }
    let mut out = df.clone();
    out.replace("atom_id_1", Series::new("atom_id_1".into(), first))?;
    out.replace("atom_id_2", Series::new("atom_id_2".into(), second))?;
    Ok(out)
}

/// The identity-key columns for one category.
///
/// Categories without a dictionary-defined key fall back to the columns
/// shared by both source frames (when given), or the bare id column.
fn identity_columns(
    category: CcdCategory,
    frames: Option<(&DataFrame, &DataFrame)>,
) -> Result<Vec<String>> {
    if let Some(key) = category.identity_key() {
        return Ok(key.iter().map(|c| (*c).to_string()).collect());
    }
    let Some((main, proto)) = frames else {
        return Err(DataError::data_quality(
            category.name(),
            "no identity key defined and no frames to derive one from",
        ));
    };
    let proto_columns: BTreeSet<&str> = proto.get_column_names_str().into_iter().collect();
    let shared: Vec<String> = main
        .get_column_names_str()
        .into_iter()
        .filter(|name| proto_columns.contains(name))
        .map(str::to_string)
        .collect();
    if shared.is_empty() {
        return Err(DataError::data_quality(
            category.name(),
            "source dictionaries share no columns to key on",
        ));
    }
    Ok(shared)
}

/// Drop rows repeating an earlier identity key, first occurrence kept.
fn dedupe_by_key(
    category: CcdCategory,
    variant: DictVariant,
    df: &DataFrame,
    key: &[String],
) -> Result<(DataFrame, DataFrame)> {
    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keep.push(seen.insert(composite_key(df, key, idx)));
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let kept = df.filter(&mask)?;
    let removed = df.filter(&!mask)?;
    if removed.height() > 0 {
        warn!(%variant, %category, rows = removed.height(), "duplicate rows dropped");
    }
    Ok((kept, removed))
}

/// Deduplicate a category present in only one source dictionary.
/// Categories without a dictionary-defined key are keyed on every column
/// of the frame, so only full-row repeats are dropped.
fn dedupe_single(
    variant: DictVariant,
    category: CcdCategory,
    df: &DataFrame,
    problems: &mut ProblemRecord,
) -> Result<DataFrame> {
    let key = match category.identity_key() {
        Some(_) => identity_columns(category, None)?,
        None => df
            .get_column_names_str()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    require_columns(category, df, &key)?;
    let (kept, removed) = dedupe_by_key(category, variant, df, &key)?;
    problems.record_duplicates(variant, category, removed);
    Ok(kept)
}

fn dedupe_variants(
    category: CcdCategory,
    key: &[String],
    main: &DataFrame,
    proto: &DataFrame,
    problems: &mut ProblemRecord,
) -> Result<(DataFrame, DataFrame)> {
    require_columns(category, main, key)?;
    require_columns(category, proto, key)?;
    let (main, main_removed) = dedupe_by_key(category, DictVariant::Main, main, key)?;
    problems.record_duplicates(DictVariant::Main, category, main_removed);
    let (proto, proto_removed) =
        dedupe_by_key(category, DictVariant::Protonation, proto, key)?;
    problems.record_duplicates(DictVariant::Protonation, category, proto_removed);
    Ok((main, proto))
}

fn require_columns(category: CcdCategory, df: &DataFrame, key: &[String]) -> Result<()> {
    for column in key {
        if df.column(column).is_err() {
            return Err(DataError::data_quality(
                category.name(),
                format!("identity column '{column}' is missing"),
            ));
        }
    }
    Ok(())
}

/// Union of both deduplicated frames, keyed rows from the main dictionary
/// winning. Differing cells in overlapping rows are recorded as conflicts;
/// protonation-only rows are appended with missing columns null-padded.
fn merge_variants(
    category: CcdCategory,
    key: &[String],
    main: &DataFrame,
    proto: &DataFrame,
    problems: &mut ProblemRecord,
) -> Result<DataFrame> {
    let mut main_rows: BTreeMap<String, usize> = BTreeMap::new();
    for idx in 0..main.height() {
        main_rows.insert(composite_key(main, key, idx), idx);
    }

    let main_columns: BTreeSet<&str> = main.get_column_names_str().into_iter().collect();
    let compare_columns: Vec<String> = proto
        .get_column_names_str()
        .into_iter()
        .filter(|name| main_columns.contains(name) && !key.iter().any(|k| k == name))
        .map(str::to_string)
        .collect();

    let mut conflicts = Vec::new();
    let mut proto_only = Vec::with_capacity(proto.height());
    for idx in 0..proto.height() {
        let row_key = composite_key(proto, key, idx);
        match main_rows.get(&row_key) {
            Some(&main_idx) => {
                proto_only.push(false);
                for column in &compare_columns {
                    let main_value = column_value_string(main, column, main_idx);
                    let proto_value = column_value_string(proto, column, idx);
                    if main_value != proto_value {
                        conflicts.push(MergeConflict {
                            key: row_key.clone(),
                            column: column.clone(),
                            main: main_value,
                            protonation: proto_value,
                        });
                    }
                }
            }
            None => proto_only.push(true),
        }
    }
    if !conflicts.is_empty() {
        warn!(%category, count = conflicts.len(), "merge conflicts, main dictionary wins");
    }
    problems.record_conflicts(category, conflicts);

    let mask = BooleanChunked::from_slice("proto_only".into(), &proto_only);
    let additions = proto.filter(&mask)?;
    if additions.height() == 0 {
        return Ok(main.clone());
    }
    Ok(concat_df_diagonal(&[main.clone(), additions])?)
}

fn sort_by_key(df: &DataFrame, key: &[String]) -> Result<DataFrame> {
    let by: Vec<&str> = key
        .iter()
        .map(String::as_str)
        .filter(|name| df.column(name).is_ok())
        .collect();
    if by.is_empty() {
        return Ok(df.clone());
    }
    Ok(df.sort(by, SortMultipleOptions::default())?)
}

/// Component ids of the protonation dictionary's `chem_comp` table.
fn component_ids(
    tables: &BTreeMap<CcdCategory, DataFrame>,
) -> Result<BTreeSet<String>> {
    let Some(comp) = tables.get(&CcdCategory::ChemComp) else {
        return Ok(BTreeSet::new());
    };
    let ids = comp.column(CcdCategory::ChemComp.id_column())?.str()?;
    Ok(ids.into_iter().flatten().map(str::to_string).collect())
}

/// Split one merged table into the amino-acid and non-amino-acid
/// partitions by membership of its component id in `aa_ids`.
fn partition_by_ids(
    category: CcdCategory,
    df: &DataFrame,
    aa_ids: &BTreeSet<String>,
) -> Result<(DataFrame, DataFrame)> {
    let id_column = category.id_column();
    let mut is_aa = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        is_aa.push(aa_ids.contains(&column_value_string(df, id_column, idx)));
    }
    let mask = BooleanChunked::from_slice("is_aa".into(), &is_aa);
    Ok((df.filter(&mask)?, df.filter(&!mask)?))
}
