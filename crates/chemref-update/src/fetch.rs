//! Downloading upstream source files.
//!
//! Network access is gated behind the `fetch` cargo feature. Without it,
//! the entry points return [`DataError::MissingDependency`] so callers can
//! tell a disabled capability apart from a download failure.

use chemref_model::{DataError, Result};

/// PubChem's full periodic-table export.
pub const PERIODIC_TABLE_URL: &str =
    "https://pubchem.ncbi.nlm.nih.gov/rest/pug/periodictable/CSV";

/// The full Chemical Component Dictionary, gzip-compressed mmCIF.
pub const CCD_MAIN_URL: &str =
    "https://files.wwpdb.org/pub/pdb/data/monomers/components.cif.gz";

/// The amino-acid protonation-variants companion dictionary.
pub const CCD_PROTONATION_URL: &str =
    "https://files.wwpdb.org/pub/pdb/data/monomers/aa-variants-v1.cif.gz";

/// Download a plain-text resource.
#[cfg(feature = "fetch")]
pub fn fetch_text(url: &str) -> Result<String> {
    tracing::info!(url, "downloading");
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| DataError::fetch(url, source.to_string()))?;
    response
        .text()
        .map_err(|source| DataError::fetch(url, source.to_string()))
}

/// Download a gzip-compressed text resource and decompress it.
#[cfg(feature = "fetch")]
pub fn fetch_gz_text(url: &str) -> Result<String> {
    use std::io::Read;

    tracing::info!(url, "downloading");
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|source| DataError::fetch(url, source.to_string()))?;
    let bytes = response
        .bytes()
        .map_err(|source| DataError::fetch(url, source.to_string()))?;
    let mut decoder = flate2::read::GzDecoder::new(bytes.as_ref());
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|source| DataError::fetch(url, source.to_string()))?;
    Ok(text)
}

#[cfg(not(feature = "fetch"))]
pub fn fetch_text(url: &str) -> Result<String> {
    Err(disabled(url))
}

#[cfg(not(feature = "fetch"))]
pub fn fetch_gz_text(url: &str) -> Result<String> {
    Err(disabled(url))
}

#[cfg(not(feature = "fetch"))]
fn disabled(url: &str) -> DataError {
    DataError::MissingDependency {
        detail: format!(
            "downloading {url} requires the 'fetch' feature of chemref-update"
        ),
    }
}
