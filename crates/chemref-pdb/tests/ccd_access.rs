//! End-to-end CCD accessor tests over a temporary data directory.

use std::fs::{self, File};
use std::path::Path;

use chemref_model::{CcdCategory, CcdPartition, DataError, VariantSelect};
use chemref_pdb::{CcdLookup, CcdQuery, ccd, dataset_name};
use chemref_store::{DataStore, Loader};
use polars::prelude::{Column, DataFrame, NamedFrom, ParquetWriter, Series};

fn write_parquet(root: &Path, name: &str, mut df: DataFrame) {
    let dir = root.join("pdb");
    fs::create_dir_all(&dir).unwrap();
    let file = File::create(dir.join(format!("{name}.parquet"))).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();
}

fn chem_comp(rows: &[(&str, &str)]) -> DataFrame {
    let ids: Vec<&str> = rows.iter().map(|(id, _)| *id).collect();
    let names: Vec<&str> = rows.iter().map(|(_, name)| *name).collect();
    let cols: Vec<Column> = vec![
        Series::new("id".into(), ids).into(),
        Series::new("name".into(), names).into(),
    ];
    DataFrame::new(cols).unwrap()
}

fn seeded_loader(root: &Path) -> Loader {
    write_parquet(
        root,
        &dataset_name(CcdCategory::ChemComp, CcdPartition::AminoAcid),
        chem_comp(&[("ALA", "alanine"), ("GLY", "glycine")]),
    );
    write_parquet(
        root,
        &dataset_name(CcdCategory::ChemComp, CcdPartition::NonAminoAcid),
        chem_comp(&[("ATP", "adenosine triphosphate"), ("HOH", "water")]),
    );
    Loader::new(DataStore::new(root))
}

#[test]
fn explicit_variant_returns_full_partition() {
    let dir = tempfile::tempdir().unwrap();
    let loader = seeded_loader(dir.path());

    let query = CcdQuery::new(CcdCategory::ChemComp).with_variant(VariantSelect::Aa);
    let CcdLookup::Found(df) = ccd(&loader, &query).unwrap() else {
        panic!("expected a table");
    };
    assert_eq!(df.height(), 2);
}

#[test]
fn any_variant_falls_through_to_non_aa() {
    let dir = tempfile::tempdir().unwrap();
    let loader = seeded_loader(dir.path());

    let query =
        CcdQuery::new(CcdCategory::ChemComp).with_component_ids(["ATP".to_string()]);
    let CcdLookup::Found(df) = ccd(&loader, &query).unwrap() else {
        panic!("expected a table");
    };
    assert_eq!(df.height(), 1);
    let id = df.column("id").unwrap().str().unwrap().get(0).unwrap();
    assert_eq!(id, "ATP");
}

#[test]
fn component_filter_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let loader = seeded_loader(dir.path());

    let query = CcdQuery::new(CcdCategory::ChemComp)
        .with_variant(VariantSelect::Aa)
        .with_component_ids(["ala".to_string(), "gly".to_string()]);
    let CcdLookup::Found(df) = ccd(&loader, &query).unwrap() else {
        panic!("expected a table");
    };
    assert_eq!(df.height(), 2);
}

#[test]
fn unmatched_filter_yields_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let loader = seeded_loader(dir.path());

    let query = CcdQuery::new(CcdCategory::ChemComp)
        .with_component_ids(["XYZ".to_string()]);
    let CcdLookup::Found(df) = ccd(&loader, &query).unwrap() else {
        panic!("expected a table");
    };
    assert_eq!(df.height(), 0);
}

#[test]
fn missing_file_reports_missing_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Loader::new(DataStore::new(dir.path()));

    let query = CcdQuery::new(CcdCategory::ChemCompAtom).with_variant(VariantSelect::Aa);
    let lookup = ccd(&loader, &query).unwrap();
    let CcdLookup::Missing {
        category,
        partition,
    } = lookup
    else {
        panic!("expected a missing lookup");
    };
    assert_eq!(category, CcdCategory::ChemCompAtom);
    assert_eq!(partition, CcdPartition::AminoAcid);
}

#[test]
fn into_table_turns_missing_into_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let loader = Loader::new(DataStore::new(dir.path()));

    let query = CcdQuery::new(CcdCategory::ChemComp).with_variant(VariantSelect::NonAa);
    let lookup = ccd(&loader, &query).unwrap();
    let err = lookup.into_table(&loader).unwrap_err();
    assert!(matches!(err, DataError::NotFound { .. }));
}
