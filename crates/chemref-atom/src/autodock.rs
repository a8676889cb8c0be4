//! AutoDock4 atom types.

use chemref_model::{DataError, Result};
use chemref_store::Loader;
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde::Deserialize;

use crate::CATEGORY;

const DATASET: &str = "autodock_atom_types";

/// One AutoDock4 atom type as stored in the bundled JSON dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct AutodockAtomType {
    /// Atom type name as used in PDBQT/GPF files, e.g. "A", "OA", "HD".
    pub r#type: String,
    /// Chemical element symbol of the atom type.
    pub element: String,
    pub description: Option<String>,
    pub hbond_acceptor: bool,
    pub hbond_donor: bool,
    /// Number of possible hydrogen bonds for directionally H-bonding
    /// types, 0 for non-H-bonding types, null for spherically H-bonding
    /// types.
    pub hbond_count: Option<u8>,
}

/// Get the AutoDock4 atom types and their properties.
///
/// One row per atom type, six columns: `type`, `element`, `description`,
/// `hbond_acceptor`, `hbond_donor`, `hbond_count`. At most one of
/// `hbond_acceptor` / `hbond_donor` is true per row; when both are false,
/// `hbond_count` is 0.
pub fn autodock_atom_types(loader: &Loader) -> Result<DataFrame> {
    let value = loader.load_json(CATEGORY, DATASET)?;
    let types: Vec<AutodockAtomType> = serde_json::from_value((*value).clone())
        .map_err(|err| DataError::data_quality(DATASET, err.to_string()))?;
    build_frame(&types)
}

fn build_frame(types: &[AutodockAtomType]) -> Result<DataFrame> {
    for atom_type in types {
        if atom_type.hbond_acceptor && atom_type.hbond_donor {
            return Err(DataError::data_quality(
                DATASET,
                format!(
                    "atom type '{}' is marked as both H-bond acceptor and donor",
                    atom_type.r#type
                ),
            ));
        }
        if !atom_type.hbond_acceptor
            && !atom_type.hbond_donor
            && atom_type.hbond_count != Some(0)
        {
            return Err(DataError::data_quality(
                DATASET,
                format!(
                    "non-H-bonding atom type '{}' must have an H-bond count of 0",
                    atom_type.r#type
                ),
            ));
        }
    }

    let columns: Vec<Column> = vec![
        Series::new(
            "type".into(),
            types.iter().map(|t| t.r#type.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "element".into(),
            types.iter().map(|t| t.element.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "description".into(),
            types
                .iter()
                .map(|t| t.description.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "hbond_acceptor".into(),
            types.iter().map(|t| t.hbond_acceptor).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "hbond_donor".into(),
            types.iter().map(|t| t.hbond_donor).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "hbond_count".into(),
            types.iter().map(|t| t.hbond_count).collect::<Vec<_>>(),
        )
        .into(),
    ];
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<AutodockAtomType> {
        serde_json::from_str(
            r#"[
                {"type": "C", "element": "C", "description": "aliphatic carbon",
                 "hbond_acceptor": false, "hbond_donor": false, "hbond_count": 0},
                {"type": "OA", "element": "O", "description": "acceptor oxygen",
                 "hbond_acceptor": true, "hbond_donor": false, "hbond_count": 2},
                {"type": "HD", "element": "H", "description": "donor hydrogen",
                 "hbond_acceptor": false, "hbond_donor": true, "hbond_count": 1},
                {"type": "SA", "element": "S", "description": null,
                 "hbond_acceptor": true, "hbond_donor": false, "hbond_count": null}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_frame_schema() {
        let df = build_frame(&sample()).unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(
            df.get_column_names_str(),
            vec![
                "type",
                "element",
                "description",
                "hbond_acceptor",
                "hbond_donor",
                "hbond_count"
            ]
        );
        let count = df.column("hbond_count").unwrap().u8().unwrap();
        assert_eq!(count.get(0), Some(0));
        assert_eq!(count.get(3), None);
    }

    #[test]
    fn test_acceptor_and_donor_never_both_true() {
        let df = build_frame(&sample()).unwrap();
        let acceptor = df.column("hbond_acceptor").unwrap().bool().unwrap();
        let donor = df.column("hbond_donor").unwrap().bool().unwrap();
        for idx in 0..df.height() {
            assert!(!(acceptor.get(idx).unwrap() && donor.get(idx).unwrap()));
        }
    }

    #[test]
    fn test_conflicting_hbond_flags_are_rejected() {
        let mut types = sample();
        types[1].hbond_donor = true;
        let err = build_frame(&types).unwrap_err();
        assert!(matches!(err, DataError::DataQuality { .. }));
    }

    #[test]
    fn test_non_hbonding_type_requires_zero_count() {
        // types[0] is "C": neither acceptor nor donor.
        let mut types = sample();
        types[0].hbond_count = Some(2);
        let err = build_frame(&types).unwrap_err();
        assert!(matches!(err, DataError::DataQuality { .. }));

        types[0].hbond_count = None;
        let err = build_frame(&types).unwrap_err();
        assert!(matches!(err, DataError::DataQuality { .. }));
    }
}
