//! Periodic-table normalization.
//!
//! Takes the raw PubChem periodic-table CSV and produces the typed,
//! enriched 118-row table published by [`crate::periodic_table`]. The
//! transform is pure: raw CSV text plus the secondary radius dataset in,
//! DataFrame out.
//!
//! The raw feed is messy in known ways: whitespace padding, electron
//! configurations suffixed with `(calculated)` or `(predicted)`,
//! oxidation states as comma-separated strings with `+` prefixes,
//! standard states phrased as free text ("Expected to be a Gas"), and
//! discovery years like "Ancient". Each quirk is handled individually
//! below; anything outside the known quirks fails loudly rather than
//! passing bad values through.

use chemref_model::{DataError, GroupBlock, Result, StandardState};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde::Deserialize;
use tracing::debug;

use crate::radii::VdwRadii;

/// Number of chemical elements in the published table.
pub const ELEMENT_COUNT: usize = 118;

/// The published column order.
pub const OUTPUT_COLUMNS: [&str; 20] = [
    "z", "symbol", "name", "period", "group", "block", "econfig", "mass", "vdwr", "vdwr_bo",
    "ie", "ea", "en_pauling", "oxstates", "state", "mp", "bp", "density", "color_cpk", "year",
];

const DATASET: &str = "periodic_table";

/// One row of the raw PubChem CSV feed.
///
/// Everything except the atomic number is kept as text here; typing and
/// cleaning happen in [`CleanElement::from_raw`] so each field's quirks are
/// handled explicitly.
#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "AtomicNumber")]
    z: u8,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "AtomicMass")]
    mass: Option<String>,
    #[serde(rename = "CPKHexColor")]
    color_cpk: Option<String>,
    #[serde(rename = "ElectronConfiguration")]
    econfig: Option<String>,
    #[serde(rename = "Electronegativity")]
    en_pauling: Option<String>,
    #[serde(rename = "AtomicRadius")]
    vdwr: Option<String>,
    #[serde(rename = "IonizationEnergy")]
    ie: Option<String>,
    #[serde(rename = "ElectronAffinity")]
    ea: Option<String>,
    #[serde(rename = "OxidationStates")]
    oxstates: Option<String>,
    #[serde(rename = "StandardState")]
    state: Option<String>,
    #[serde(rename = "MeltingPoint")]
    mp: Option<String>,
    #[serde(rename = "BoilingPoint")]
    bp: Option<String>,
    #[serde(rename = "Density")]
    density: Option<String>,
    #[serde(rename = "GroupBlock")]
    block: Option<String>,
    #[serde(rename = "YearDiscovered")]
    year: Option<String>,
}

#[derive(Debug)]
struct CleanElement {
    z: u8,
    symbol: String,
    name: Option<String>,
    period: u8,
    group: Option<u8>,
    block: GroupBlock,
    econfig: Option<String>,
    mass: Option<f64>,
    vdwr: Option<u16>,
    vdwr_bo: Option<u16>,
    ie: Option<f64>,
    ea: Option<f64>,
    en_pauling: Option<f64>,
    oxstates: Option<Vec<i8>>,
    state: Option<StandardState>,
    mp: Option<f64>,
    bp: Option<f64>,
    density: Option<f64>,
    color_cpk: Option<String>,
    year: Option<u16>,
}

impl CleanElement {
    fn from_raw(raw: RawElement, radii: &VdwRadii) -> Result<Self> {
        let z = raw.z;
        let symbol = raw.symbol.trim().to_string();
        let block_text = non_empty(raw.block.as_deref()).ok_or_else(|| {
            DataError::data_quality(DATASET, format!("element {z} has no group block"))
        })?;
        // Unrecognized group blocks mean the source vocabulary changed;
        // pass-through would silently corrupt the published enumeration.
        let block: GroupBlock = block_text.parse().map_err(|()| {
            DataError::data_quality(
                DATASET,
                format!("element {z} has unrecognized group block '{block_text}'"),
            )
        })?;
        let vdwr_bo = radii.radius_pm(&symbol, z);

        Ok(Self {
            z,
            period: period_of(z),
            group: group_of(z),
            block,
            vdwr_bo,
            name: non_empty(raw.name.as_deref()).map(str::to_lowercase),
            econfig: non_empty(raw.econfig.as_deref())
                .map(|text| strip_econfig_qualifier(text).to_string()),
            mass: parse_float(z, "AtomicMass", raw.mass.as_deref())?,
            vdwr: parse_radius(z, raw.vdwr.as_deref())?,
            ie: parse_float(z, "IonizationEnergy", raw.ie.as_deref())?,
            ea: parse_float(z, "ElectronAffinity", raw.ea.as_deref())?,
            en_pauling: parse_float(z, "Electronegativity", raw.en_pauling.as_deref())?,
            oxstates: non_empty(raw.oxstates.as_deref())
                .map(|text| parse_oxidation_states(z, text))
                .transpose()?,
            state: non_empty(raw.state.as_deref()).and_then(StandardState::classify),
            mp: parse_float(z, "MeltingPoint", raw.mp.as_deref())?,
            bp: parse_float(z, "BoilingPoint", raw.bp.as_deref())?,
            density: parse_float(z, "Density", raw.density.as_deref())?,
            color_cpk: non_empty(raw.color_cpk.as_deref()).map(str::to_string),
            // Non-numeric years ("Ancient") mean known since antiquity.
            year: non_empty(raw.year.as_deref()).and_then(|text| text.parse().ok()),
            symbol,
        })
    }
}

/// Normalize the raw PubChem periodic-table CSV into the published schema.
///
/// The output always has exactly 118 rows, one per element 1–118 sorted by
/// atomic number, with exactly the [`OUTPUT_COLUMNS`] columns.
pub fn normalize_periodic_table(csv_text: &str, radii: &VdwRadii) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let mut elements = Vec::with_capacity(ELEMENT_COUNT);
    for record in reader.deserialize::<RawElement>() {
        let raw = record
            .map_err(|err| DataError::data_quality(DATASET, format!("malformed CSV: {err}")))?;
        elements.push(CleanElement::from_raw(raw, radii)?);
    }

    elements.sort_by_key(|element| element.z);
    if elements.len() != ELEMENT_COUNT {
        return Err(DataError::data_quality(
            DATASET,
            format!("expected {ELEMENT_COUNT} elements, got {}", elements.len()),
        ));
    }
    for (index, element) in elements.iter().enumerate() {
        if usize::from(element.z) != index + 1 {
            return Err(DataError::data_quality(
                DATASET,
                format!("atomic numbers are not contiguous at z={}", element.z),
            ));
        }
    }

    debug!(rows = elements.len(), "periodic table normalized");
    build_frame(&elements)
}

fn build_frame(elements: &[CleanElement]) -> Result<DataFrame> {
    let oxstates: Vec<Option<Series>> = elements
        .iter()
        .map(|e| {
            e.oxstates
                .as_ref()
                .map(|states| Series::new("".into(), states.as_slice()))
        })
        .collect();

    let columns: Vec<Column> = vec![
        Series::new("z".into(), elements.iter().map(|e| e.z).collect::<Vec<_>>()).into(),
        Series::new(
            "symbol".into(),
            elements.iter().map(|e| e.symbol.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "name".into(),
            elements.iter().map(|e| e.name.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "period".into(),
            elements.iter().map(|e| e.period).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "group".into(),
            elements.iter().map(|e| e.group).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "block".into(),
            elements
                .iter()
                .map(|e| e.block.as_str())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "econfig".into(),
            elements.iter().map(|e| e.econfig.clone()).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "mass".into(),
            elements.iter().map(|e| e.mass).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "vdwr".into(),
            elements.iter().map(|e| e.vdwr).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "vdwr_bo".into(),
            elements.iter().map(|e| e.vdwr_bo).collect::<Vec<_>>(),
        )
        .into(),
        Series::new("ie".into(), elements.iter().map(|e| e.ie).collect::<Vec<_>>()).into(),
        Series::new("ea".into(), elements.iter().map(|e| e.ea).collect::<Vec<_>>()).into(),
        Series::new(
            "en_pauling".into(),
            elements.iter().map(|e| e.en_pauling).collect::<Vec<_>>(),
        )
        .into(),
        Series::new("oxstates".into(), oxstates).into(),
        Series::new(
            "state".into(),
            elements
                .iter()
                .map(|e| e.state.map(|s| s.as_str().to_string()))
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new("mp".into(), elements.iter().map(|e| e.mp).collect::<Vec<_>>()).into(),
        Series::new("bp".into(), elements.iter().map(|e| e.bp).collect::<Vec<_>>()).into(),
        Series::new(
            "density".into(),
            elements.iter().map(|e| e.density).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "color_cpk".into(),
            elements
                .iter()
                .map(|e| e.color_cpk.clone())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "year".into(),
            elements.iter().map(|e| e.year).collect::<Vec<_>>(),
        )
        .into(),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Period number (1–7) of an element.
///
/// Precondition: `z` is in `[1, 118]`; atomic numbers past oganesson are
/// out of domain.
pub fn period_of(z: u8) -> u8 {
    debug_assert!((1..=118).contains(&z));
    match z {
        1..=2 => 1,
        3..=10 => 2,
        11..=18 => 3,
        19..=36 => 4,
        37..=54 => 5,
        55..=86 => 6,
        _ => 7,
    }
}

/// IUPAC group number (1–18) of an element, or `None` for lanthanides
/// (58–71) and actinides (90–103).
///
/// La (57) and Ac (89) keep their computed group 3. Helium sits in the
/// s-block but belongs to group 18. In periods 6–7, positions past the
/// f-block shift down by 14 before mapping to groups.
///
/// Precondition: `z` is in `[1, 118]`.
pub fn group_of(z: u8) -> Option<u8> {
    debug_assert!((1..=118).contains(&z));
    if z == 2 {
        return Some(18);
    }
    if (58..=71).contains(&z) || (90..=103).contains(&z) {
        return None;
    }
    let period_start = match z {
        1..=2 => 0,
        3..=10 => 2,
        11..=18 => 10,
        19..=36 => 18,
        37..=54 => 36,
        55..=86 => 54,
        _ => 86,
    };
    let position = z - period_start;
    let group = match position {
        1 => 1,
        2 => 2,
        _ if z <= 18 => position + 10,
        _ if (72..=86).contains(&z) || z >= 104 => position - 14,
        _ => position,
    };
    Some(group)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Drop the trailing `(calculated)` / `(predicted)` qualifier from an
/// electron-configuration string.
fn strip_econfig_qualifier(text: &str) -> &str {
    text.strip_suffix("(calculated)")
        .or_else(|| text.strip_suffix("(predicted)"))
        .unwrap_or(text)
        .trim()
}

fn parse_float(z: u8, field: &str, value: Option<&str>) -> Result<Option<f64>> {
    non_empty(value)
        .map(|text| {
            text.parse::<f64>().map_err(|_| {
                DataError::data_quality(
                    DATASET,
                    format!("element {z}: {field} value '{text}' is not a number"),
                )
            })
        })
        .transpose()
}

fn parse_radius(z: u8, value: Option<&str>) -> Result<Option<u16>> {
    non_empty(value)
        .map(|text| {
            text.parse::<u16>().map_err(|_| {
                DataError::data_quality(
                    DATASET,
                    format!("element {z}: AtomicRadius value '{text}' is not an integer"),
                )
            })
        })
        .transpose()
}

/// Parse a comma-separated oxidation-state string such as `"+2, +3"`.
fn parse_oxidation_states(z: u8, text: &str) -> Result<Vec<i8>> {
    text.split(',')
        .map(|item| {
            let trimmed = item.trim();
            let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
            unsigned.parse::<i8>().map_err(|_| {
                DataError::data_quality(
                    DATASET,
                    format!("element {z}: oxidation state '{trimmed}' is not an integer"),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Expected IUPAC group for every element, pinned literally.
    ///
    /// The derivation has several historical formulations that disagree on
    /// helium and the f-block boundaries, so the assignment is checked
    /// element by element instead of against a re-derivation.
    const GOLD_GROUPS: [(u8, Option<u8>); 118] = [
        (1, Some(1)), (2, Some(18)), (3, Some(1)), (4, Some(2)), (5, Some(13)),
        (6, Some(14)), (7, Some(15)), (8, Some(16)), (9, Some(17)), (10, Some(18)),
        (11, Some(1)), (12, Some(2)), (13, Some(13)), (14, Some(14)), (15, Some(15)),
        (16, Some(16)), (17, Some(17)), (18, Some(18)), (19, Some(1)), (20, Some(2)),
        (21, Some(3)), (22, Some(4)), (23, Some(5)), (24, Some(6)), (25, Some(7)),
        (26, Some(8)), (27, Some(9)), (28, Some(10)), (29, Some(11)), (30, Some(12)),
        (31, Some(13)), (32, Some(14)), (33, Some(15)), (34, Some(16)), (35, Some(17)),
        (36, Some(18)), (37, Some(1)), (38, Some(2)), (39, Some(3)), (40, Some(4)),
        (41, Some(5)), (42, Some(6)), (43, Some(7)), (44, Some(8)), (45, Some(9)),
        (46, Some(10)), (47, Some(11)), (48, Some(12)), (49, Some(13)), (50, Some(14)),
        (51, Some(15)), (52, Some(16)), (53, Some(17)), (54, Some(18)), (55, Some(1)),
        (56, Some(2)), (57, Some(3)), (58, None), (59, None), (60, None),
        (61, None), (62, None), (63, None), (64, None), (65, None),
        (66, None), (67, None), (68, None), (69, None), (70, None),
        (71, None), (72, Some(4)), (73, Some(5)), (74, Some(6)), (75, Some(7)),
        (76, Some(8)), (77, Some(9)), (78, Some(10)), (79, Some(11)), (80, Some(12)),
        (81, Some(13)), (82, Some(14)), (83, Some(15)), (84, Some(16)), (85, Some(17)),
        (86, Some(18)), (87, Some(1)), (88, Some(2)), (89, Some(3)), (90, None),
        (91, None), (92, None), (93, None), (94, None), (95, None),
        (96, None), (97, None), (98, None), (99, None), (100, None),
        (101, None), (102, None), (103, None), (104, Some(4)), (105, Some(5)),
        (106, Some(6)), (107, Some(7)), (108, Some(8)), (109, Some(9)), (110, Some(10)),
        (111, Some(11)), (112, Some(12)), (113, Some(13)), (114, Some(14)), (115, Some(15)),
        (116, Some(16)), (117, Some(17)), (118, Some(18)),
    ];

    #[test]
    fn test_group_gold_table() {
        for (z, expected) in GOLD_GROUPS {
            assert_eq!(group_of(z), expected, "z={z}");
        }
    }

    #[test]
    fn test_period_boundaries() {
        let expected = [
            (1, 1), (2, 1), (3, 2), (10, 2), (11, 3), (18, 3), (19, 4), (36, 4),
            (37, 5), (54, 5), (55, 6), (86, 6), (87, 7), (118, 7),
        ];
        for (z, period) in expected {
            assert_eq!(period_of(z), period, "z={z}");
        }
    }

    #[test]
    fn test_strip_econfig_qualifier() {
        assert_eq!(
            strip_econfig_qualifier("[Rn]5f14 6d10 7s2 7p6 (predicted)"),
            "[Rn]5f14 6d10 7s2 7p6"
        );
        assert_eq!(
            strip_econfig_qualifier("[Og]8s1 (calculated)"),
            "[Og]8s1"
        );
        assert_eq!(strip_econfig_qualifier("[He]2s2 2p4"), "[He]2s2 2p4");
    }

    #[test]
    fn test_parse_oxidation_states() {
        assert_eq!(parse_oxidation_states(26, "+2, +3").unwrap(), vec![2, 3]);
        assert_eq!(
            parse_oxidation_states(17, "-1, +1, +3, +5, +7").unwrap(),
            vec![-1, 1, 3, 5, 7]
        );
        assert!(parse_oxidation_states(1, "+2, high").is_err());
    }

    const NOBLE_GASES: [u8; 7] = [2, 10, 18, 36, 54, 86, 118];

    // Synthetic 118-element feed exercising the full pipeline. The special
    // cases are planted at their real atomic numbers.
    fn synthetic_csv(block_override: Option<(u8, &str)>) -> String {
        let header = "AtomicNumber,Symbol,Name,AtomicMass,CPKHexColor,ElectronConfiguration,\
                      Electronegativity,AtomicRadius,IonizationEnergy,ElectronAffinity,\
                      OxidationStates,StandardState,MeltingPoint,BoilingPoint,Density,\
                      GroupBlock,YearDiscovered";
        let mut lines = vec![header.to_string()];
        for z in 1..=118u8 {
            let block = match block_override {
                Some((target, text)) if target == z => text,
                _ if NOBLE_GASES.contains(&z) => "Noble Gas",
                _ => "Nonmetal",
            };
            let econfig = if z == 118 {
                "[Rn]5f14 6d10 7s2 7p6 (predicted)"
            } else {
                "1s2"
            };
            let state = if z == 2 { "Expected to be a Gas" } else { "Solid" };
            let oxstates = if z == 26 { "\"+2, +3\"" } else { "" };
            let year = if z == 26 { "Ancient" } else { "1900" };
            lines.push(format!(
                "{z},E{z}, Element {z} ,{mass},FFFFFF,{econfig},2.2,120,13.6,0.75,\
                 {oxstates},{state},100.0,200.0,1.0,{block},{year}",
                mass = f64::from(z) * 2.0,
            ));
        }
        lines.join("\n")
    }

    fn test_radii() -> VdwRadii {
        let mut object = serde_json::Map::new();
        for z in 1..=109u8 {
            object.insert(format!("E{z}"), json!(100 + u16::from(z)));
        }
        VdwRadii::from_json(&serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn test_normalize_shape_and_order() {
        let df = normalize_periodic_table(&synthetic_csv(None), &test_radii()).unwrap();
        assert_eq!(df.height(), ELEMENT_COUNT);
        assert_eq!(df.get_column_names_str(), OUTPUT_COLUMNS.to_vec());

        let z = df.column("z").unwrap().u8().unwrap();
        for (index, value) in z.into_iter().enumerate() {
            assert_eq!(value, Some(index as u8 + 1));
        }
    }

    #[test]
    fn test_normalize_cleaning() {
        let df = normalize_periodic_table(&synthetic_csv(None), &test_radii()).unwrap();

        let names = df.column("name").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some("element 1"));

        let econfig = df.column("econfig").unwrap().str().unwrap();
        assert_eq!(econfig.get(117), Some("[Rn]5f14 6d10 7s2 7p6"));

        let state = df.column("state").unwrap().str().unwrap();
        assert_eq!(state.get(1), Some("gas"));
        assert_eq!(state.get(0), Some("solid"));

        // "Ancient" years become null, numeric years parse.
        let year = df.column("year").unwrap().u16().unwrap();
        assert_eq!(year.get(25), None);
        assert_eq!(year.get(0), Some(1900));

        // Secondary radii join by symbol; past z=109 the default kicks in.
        let vdwr_bo = df.column("vdwr_bo").unwrap().u16().unwrap();
        assert_eq!(vdwr_bo.get(0), Some(101));
        assert_eq!(vdwr_bo.get(109), Some(200));

        let oxstates = df.column("oxstates").unwrap().list().unwrap();
        let iron = oxstates.get_as_series(25).unwrap();
        assert_eq!(
            iron.i8().unwrap().into_iter().collect::<Vec<_>>(),
            vec![Some(2), Some(3)]
        );
        assert!(oxstates.get_as_series(0).is_none());
    }

    #[test]
    fn test_noble_gas_block_implies_group_18() {
        let df = normalize_periodic_table(&synthetic_csv(None), &test_radii()).unwrap();
        let block = df.column("block").unwrap().str().unwrap();
        let group = df.column("group").unwrap().u8().unwrap();

        let mut noble_rows = 0;
        for idx in 0..df.height() {
            if block.get(idx) == Some("noble gas") {
                noble_rows += 1;
                assert_eq!(group.get(idx), Some(18), "row {idx}");
            }
        }
        assert_eq!(noble_rows, NOBLE_GASES.len());
    }

    #[test]
    fn test_unrecognized_group_block_fails_loudly() {
        let csv = synthetic_csv(Some((42, "plasma")));
        let err = normalize_periodic_table(&csv, &test_radii()).unwrap_err();
        assert!(matches!(err, DataError::DataQuality { .. }));
        assert!(err.to_string().contains("plasma"));
    }

    #[test]
    fn test_wrong_row_count_is_rejected() {
        let mut csv = synthetic_csv(None);
        csv.truncate(csv.rfind('\n').unwrap());
        let err = normalize_periodic_table(&csv, &test_radii()).unwrap_err();
        assert!(matches!(err, DataError::DataQuality { .. }));
    }
}
