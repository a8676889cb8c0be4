//! Secondary van-der-Waals radius dataset (Blue Obelisk Data Repository).

use std::collections::BTreeMap;

use chemref_model::{DataError, Result};
use chemref_store::Loader;

use crate::CATEGORY;

/// Van-der-Waals radii in picometers, keyed by element symbol.
///
/// The Blue Obelisk repository only covers elements through meitnerium
/// (z = 109); heavier elements fall back to a fixed 200 pm default.
#[derive(Debug, Clone)]
pub struct VdwRadii {
    by_symbol: BTreeMap<String, u16>,
}

impl VdwRadii {
    /// Fallback radius for elements the secondary source lacks.
    pub const DEFAULT_RADIUS_PM: u16 = 200;

    /// Highest atomic number covered by the secondary source.
    pub const COVERED_MAX_Z: u8 = 109;

    /// Load the bundled `atom/radii_vdw_blue_obelisk.json` dataset.
    pub fn load(loader: &Loader) -> Result<Self> {
        let value = loader.load_json(CATEGORY, "radii_vdw_blue_obelisk")?;
        Self::from_json(&value)
    }

    /// Parse a `{"symbol": radius_pm}` JSON object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            DataError::data_quality("radii_vdw_blue_obelisk", "expected a JSON object")
        })?;
        let mut by_symbol = BTreeMap::new();
        for (symbol, radius) in object {
            let pm = radius
                .as_u64()
                .and_then(|v| u16::try_from(v).ok())
                .ok_or_else(|| {
                    DataError::data_quality(
                        "radii_vdw_blue_obelisk",
                        format!("radius for '{symbol}' is not a small integer"),
                    )
                })?;
            by_symbol.insert(symbol.clone(), pm);
        }
        Ok(Self { by_symbol })
    }

    /// Radius for an element, defaulting to 200 pm past the covered range.
    ///
    /// Returns `None` only for elements within the covered range that the
    /// source genuinely lacks.
    pub fn radius_pm(&self, symbol: &str, z: u8) -> Option<u16> {
        self.by_symbol
            .get(symbol)
            .copied()
            .or_else(|| (z > Self::COVERED_MAX_Z).then_some(Self::DEFAULT_RADIUS_PM))
    }
}
