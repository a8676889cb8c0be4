//! Mapping from (category, name) to data file paths.

use std::path::{Path, PathBuf};

use chemref_model::{DataError, Result};

use crate::paths::data_root;

/// On-disk format of a data file.
///
/// The set is closed: every bundled dataset is either a JSON document or a
/// parquet table, and the loader dispatches on this enum rather than on a
/// file-extension string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Parquet,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Parquet => "parquet",
        }
    }
}

/// Resolves dataset names to files under a fixed root directory.
///
/// Layout: `{root}/{category}/{name}.{extension}`. The store performs no
/// I/O beyond an existence check; reading and parsing belong to the
/// [`crate::Loader`].
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the default data directory (see [`crate::paths`]).
    pub fn from_env() -> Self {
        Self::new(data_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The deterministic path for a dataset, whether or not it exists.
    pub fn path_for(&self, category: &str, name: &str, format: FileFormat) -> PathBuf {
        self.root
            .join(category)
            .join(format!("{name}.{ext}", ext = format.extension()))
    }

    /// Resolve a dataset to an existing file.
    ///
    /// Fails with [`DataError::NotFound`] if the file is absent.
    pub fn resolve(&self, category: &str, name: &str, format: FileFormat) -> Result<PathBuf> {
        self.try_resolve(category, name, format)
            .ok_or_else(|| DataError::NotFound {
                category: category.to_string(),
                name: name.to_string(),
                path: self.path_for(category, name, format),
            })
    }

    /// Resolve a dataset, returning `None` if the file is absent.
    ///
    /// Used by callers that treat a missing file as a state to act on
    /// (e.g. run the update pipeline) rather than an error.
    pub fn try_resolve(&self, category: &str, name: &str, format: FileFormat) -> Option<PathBuf> {
        let path = self.path_for(category, name, format);
        path.is_file().then_some(path)
    }
}
