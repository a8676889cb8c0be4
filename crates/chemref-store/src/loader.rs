//! Cached loading of bundled data files.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use chemref_model::{DataError, Result};
use polars::prelude::{DataFrame, Expr, LazyFrame, ParquetReader, PlPath, ScanArgsParquet, SerReader};

use tracing::debug;

use crate::cache::{CacheKey, TableCache};
use crate::store::{DataStore, FileFormat};

/// Options for a single table load.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Skip the cache entirely (no lookup, no insertion).
    pub no_cache: bool,
    /// Row filter applied while scanning the file, before materializing.
    ///
    /// Filtered loads bypass the cache in both directions: a row subset
    /// cached under the dataset key would poison later unfiltered reads.
    pub filter: Option<Expr>,
}

impl LoadOptions {
    pub fn no_cache() -> Self {
        Self {
            no_cache: true,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Loads data files through the [`DataStore`], retaining unfiltered tables
/// in a [`TableCache`].
///
/// Cached values are shared immutable; callers needing to mutate a table
/// must clone out of the returned `Arc`.
#[derive(Debug, Default)]
pub struct Loader {
    store: DataStore,
    cache: TableCache,
}

impl Loader {
    pub fn new(store: DataStore) -> Self {
        Self {
            store,
            cache: TableCache::new(),
        }
    }

    /// Loader over the default data directory.
    pub fn from_env() -> Self {
        Self::new(DataStore::from_env())
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    /// Load a parquet table by category and name.
    pub fn load_table(
        &self,
        category: &str,
        name: &str,
        options: LoadOptions,
    ) -> Result<Arc<DataFrame>> {
        let path = self.store.resolve(category, name, FileFormat::Parquet)?;
        if let Some(filter) = options.filter {
            return Ok(Arc::new(scan_filtered(&path, filter)?));
        }
        if options.no_cache {
            return Ok(Arc::new(read_parquet(&path)?));
        }
        self.cache
            .table_or_insert_with(CacheKey::new(category, name), || read_parquet(&path))
    }

    /// Load a JSON document by category and name.
    pub fn load_json(&self, category: &str, name: &str) -> Result<Arc<serde_json::Value>> {
        let path = self.store.resolve(category, name, FileFormat::Json)?;
        self.cache
            .json_or_insert_with(CacheKey::new(category, name), || read_json(&path))
    }
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    debug!(path = %path.display(), "reading parquet file");
    let file = File::open(path).map_err(|source| DataError::io(path, source))?;
    Ok(ParquetReader::new(file).finish()?)
}

/// Scan a parquet file lazily and filter rows before materializing.
///
/// Large tables (the CCD atom table is ~70 MB) are only ever pulled through
/// this path when a component filter is given, so unused row groups are
/// skipped instead of loaded.
fn scan_filtered(path: &Path, filter: Expr) -> Result<DataFrame> {
    let path_str = path.to_string_lossy();
    let lf = LazyFrame::scan_parquet(PlPath::new(&path_str), ScanArgsParquet::default())?;
    Ok(lf.filter(filter).collect()?)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    debug!(path = %path.display(), "reading json file");
    let text = std::fs::read_to_string(path).map_err(|source| DataError::io(path, source))?;
    serde_json::from_str(&text).map_err(|source| {
        DataError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, source))
    })
}
