//! Reference schemas for the supported CCD categories.
//!
//! Column lists follow the PDBx/mmCIF dictionary definitions of each
//! category. Validation is non-strict: unexpected columns and values that
//! do not parse as their declared type are reported as issues, never
//! dropped. Numeric columns are cast in place so the persisted tables
//! carry proper dtypes instead of raw dictionary strings.

use chemref_model::{CcdCategory, Result, ValidationIssue};
use polars::prelude::{DataFrame, DataType};

/// Suffix marking an estimated-standard-deviation companion column.
pub const ESD_SUFFIX: &str = "_esd";

/// Declared type of a dictionary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Int,
    Float,
}

/// One column of a category's reference schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn s(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Str,
    }
}

const fn i(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Int,
    }
}

const fn f(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Float,
    }
}

/// The reference schema of one category, in dictionary column order.
pub fn reference_schema(category: CcdCategory) -> &'static [ColumnSpec] {
    match category {
        CcdCategory::ChemComp => const { &[
            s("id"),
            s("name"),
            s("type"),
            s("pdbx_type"),
            s("formula"),
            s("mon_nstd_parent_comp_id"),
            s("pdbx_synonyms"),
            i("pdbx_formal_charge"),
            s("pdbx_initial_date"),
            s("pdbx_modified_date"),
            s("pdbx_ambiguous_flag"),
            s("pdbx_release_status"),
            s("pdbx_replaced_by"),
            s("pdbx_replaces"),
            f("formula_weight"),
            s("one_letter_code"),
            s("three_letter_code"),
            s("pdbx_model_coordinates_details"),
            s("pdbx_model_coordinates_missing_flag"),
            s("pdbx_ideal_coordinates_details"),
            s("pdbx_ideal_coordinates_missing_flag"),
            s("pdbx_model_coordinates_db_code"),
            s("pdbx_subcomponent_list"),
            s("pdbx_processing_site"),
        ] },
        CcdCategory::ChemCompAtom => const { &[
            s("comp_id"),
            s("atom_id"),
            s("alt_atom_id"),
            s("type_symbol"),
            i("charge"),
            i("pdbx_align"),
            s("pdbx_aromatic_flag"),
            s("pdbx_leaving_atom_flag"),
            s("pdbx_stereo_config"),
            f("model_Cartn_x"),
            f("model_Cartn_y"),
            f("model_Cartn_z"),
            f("pdbx_model_Cartn_x_ideal"),
            f("pdbx_model_Cartn_y_ideal"),
            f("pdbx_model_Cartn_z_ideal"),
            s("pdbx_component_atom_id"),
            s("pdbx_component_comp_id"),
            i("pdbx_ordinal"),
        ] },
        CcdCategory::ChemCompBond => const { &[
            s("comp_id"),
            s("atom_id_1"),
            s("atom_id_2"),
            s("value_order"),
            s("pdbx_aromatic_flag"),
            s("pdbx_stereo_config"),
            i("pdbx_ordinal"),
        ] },
        CcdCategory::PdbxChemCompAtomRelated => const { &[
            s("comp_id"),
            s("atom_id"),
            s("related_comp_id"),
            s("related_atom_id"),
            s("related_type"),
        ] },
        CcdCategory::PdbxChemCompAudit => const { &[
            s("comp_id"),
            s("action_type"),
            s("date"),
            s("processing_site"),
        ] },
        CcdCategory::PdbxChemCompDescriptor => const { &[
            s("comp_id"),
            s("type"),
            s("program"),
            s("program_version"),
            s("descriptor"),
        ] },
        CcdCategory::PdbxChemCompFeature => const { &[
            s("comp_id"),
            s("type"),
            s("value"),
            s("source"),
            s("support"),
        ] },
        CcdCategory::PdbxChemCompIdentifier => const { &[
            s("comp_id"),
            s("type"),
            s("program"),
            s("program_version"),
            s("identifier"),
        ] },
        CcdCategory::PdbxChemCompPcm => const { &[
            i("pcm_id"),
            s("comp_id"),
            s("modified_residue_id"),
            s("type"),
            s("category"),
            s("position"),
            s("polypeptide_position"),
            s("comp_id_linking_atom"),
            s("modified_residue_id_linking_atom"),
            s("uniprot_specific_ptm_accession"),
            s("uniprot_generic_ptm_accession"),
        ] },
        CcdCategory::PdbxChemCompRelated => const { &[
            s("comp_id"),
            s("related_comp_id"),
            s("relationship_type"),
            s("details"),
        ] },
        CcdCategory::PdbxChemCompSynonyms => const { &[
            i("ordinal"),
            s("comp_id"),
            s("name"),
            s("provenance"),
            s("type"),
        ] },
    }
}

/// Declared type of one column, if the schema knows it.
pub fn expected_type(category: CcdCategory, column: &str) -> Option<ColumnType> {
    reference_schema(category)
        .iter()
        .find(|spec| spec.name == column)
        .map(|spec| spec.ty)
}

/// Validate one category table against its reference schema.
///
/// Returns the table with numeric columns cast to their declared dtypes,
/// plus the issues found. Unparseable numeric cells become null and are
/// counted; unexpected columns are reported but kept as strings. Columns
/// carrying the [`ESD_SUFFIX`] are exempt, they are stripped later in the
/// pipeline.
pub fn validate_category(
    category: CcdCategory,
    df: &DataFrame,
) -> Result<(DataFrame, Vec<ValidationIssue>)> {
    let mut out = df.clone();
    let mut issues = Vec::new();

    let names: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect();
    for name in names {
        if name.ends_with(ESD_SUFFIX) {
            continue;
        }
        let Some(ty) = expected_type(category, &name) else {
            issues.push(ValidationIssue {
                column: name.clone(),
                detail: "not in the reference schema".to_string(),
                rows: df.height(),
            });
            continue;
        };
        let dtype = match ty {
            ColumnType::Str => continue,
            ColumnType::Int => DataType::Int64,
            ColumnType::Float => DataType::Float64,
        };
        let column = out.column(&name)?;
        let before = column.null_count();
        let cast = column.cast(&dtype)?;
        let failed = cast.null_count() - before;
        if failed > 0 {
            issues.push(ValidationIssue {
                column: name.clone(),
                detail: format!("{} values do not parse as {dtype}", failed),
                rows: failed,
            });
        }
        out.replace(&name, cast.as_materialized_series().clone())?;
    }
    Ok((out, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    fn bond_frame() -> DataFrame {
        let cols: Vec<Column> = vec![
            Series::new("comp_id".into(), &["ALA", "ALA"]).into(),
            Series::new("atom_id_1".into(), &["N", "CA"]).into(),
            Series::new("atom_id_2".into(), &["CA", "CB"]).into(),
            Series::new("value_order".into(), &["SING", "SING"]).into(),
            Series::new("pdbx_ordinal".into(), &[Some("1"), Some("x")]).into(),
        ];
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn test_every_schema_starts_with_identity() {
        for cat in CcdCategory::ALL {
            let schema = reference_schema(cat);
            assert!(
                schema.iter().any(|spec| spec.name == cat.id_column()),
                "category {cat}"
            );
        }
    }

    #[test]
    fn test_numeric_cast_and_failure_count() {
        let (out, issues) = validate_category(CcdCategory::ChemCompBond, &bond_frame()).unwrap();
        assert_eq!(
            out.column("pdbx_ordinal").unwrap().dtype(),
            &DataType::Int64
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column, "pdbx_ordinal");
        assert_eq!(issues[0].rows, 1);
        // The unparseable row is kept, as null.
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_unexpected_column_is_reported_and_kept() {
        let mut df = bond_frame();
        let extra: Column = Series::new("mystery".into(), &["a", "b"]).into();
        df.with_column(extra).unwrap();
        let (out, issues) = validate_category(CcdCategory::ChemCompBond, &df).unwrap();
        assert!(issues.iter().any(|i| i.column == "mystery"));
        assert!(out.column("mystery").is_ok());
    }

    #[test]
    fn test_esd_columns_are_exempt() {
        let mut df = bond_frame();
        let esd: Column = Series::new("length_esd".into(), &["0.01", "0.02"]).into();
        df.with_column(esd).unwrap();
        let (_, issues) = validate_category(CcdCategory::ChemCompBond, &df).unwrap();
        assert!(issues.iter().all(|i| i.column != "length_esd"));
    }
}
