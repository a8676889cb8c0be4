//! Writing regenerated datasets back into the data directory.

use std::fs::{self, File};
use std::path::PathBuf;

use chemref_model::{DataError, Result};
use chemref_store::{DataStore, FileFormat, Loader};
use chemref_store::cache::CacheKey;
use polars::prelude::{DataFrame, ParquetWriter};
use tracing::info;

/// Write one parquet dataset, creating the category directory as needed,
/// and evict any cached copy so the next load sees the new file.
pub fn write_parquet(
    loader: &Loader,
    category: &str,
    name: &str,
    df: &mut DataFrame,
) -> Result<PathBuf> {
    let path = prepare(loader.store(), category, name, FileFormat::Parquet)?;
    let file = File::create(&path).map_err(|source| DataError::io(&path, source))?;
    ParquetWriter::new(file).finish(df)?;
    loader.cache().evict(&CacheKey::new(category, name));
    info!(category, name, rows = df.height(), path = %path.display(), "dataset written");
    Ok(path)
}

/// Write one JSON dataset, creating the category directory as needed.
pub fn write_json(
    loader: &Loader,
    category: &str,
    name: &str,
    value: &serde_json::Value,
) -> Result<PathBuf> {
    let path = prepare(loader.store(), category, name, FileFormat::Json)?;
    let text = serde_json::to_string_pretty(value).map_err(|source| {
        DataError::io(
            &path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, source),
        )
    })?;
    fs::write(&path, text).map_err(|source| DataError::io(&path, source))?;
    loader.cache().evict(&CacheKey::new(category, name));
    info!(category, name, path = %path.display(), "dataset written");
    Ok(path)
}

fn prepare(
    store: &DataStore,
    category: &str,
    name: &str,
    format: FileFormat,
) -> Result<PathBuf> {
    let path = store.path_for(category, name, format);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| DataError::io(parent, source))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemref_store::LoadOptions;
    use polars::prelude::{Column, NamedFrom, Series};

    #[test]
    fn test_write_creates_directories_and_evicts() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new(DataStore::new(dir.path()));

        let col: Column = Series::new("z".into(), &[1i64]).into();
        let mut df = DataFrame::new(vec![col]).unwrap();
        let path = write_parquet(&loader, "atom", "periodic_table", &mut df).unwrap();
        assert!(path.is_file());

        let loaded = loader
            .load_table("atom", "periodic_table", LoadOptions::default())
            .unwrap();
        assert_eq!(loaded.as_ref(), &df);

        // Rewrite with different content; the cached copy must not survive.
        let col: Column = Series::new("z".into(), &[1i64, 2]).into();
        let mut bigger = DataFrame::new(vec![col]).unwrap();
        write_parquet(&loader, "atom", "periodic_table", &mut bigger).unwrap();
        let reloaded = loader
            .load_table("atom", "periodic_table", LoadOptions::default())
            .unwrap();
        assert_eq!(reloaded.height(), 2);
    }
}
