//! Type-safe enumerations for chemref concepts.
//!
//! These enums replace the strings the source datasets use for concepts
//! with a small closed value set: the two source dictionaries, the
//! amino-acid partition, and the controlled vocabularies of the periodic
//! table (group block, standard state).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two source dictionaries merged by the CCD curator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DictVariant {
    /// The full Chemical Component Dictionary.
    Main,
    /// The companion dictionary of amino-acid protonation variants.
    Protonation,
}

impl DictVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            DictVariant::Main => "main",
            DictVariant::Protonation => "protonation",
        }
    }
}

impl fmt::Display for DictVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The amino-acid / non-amino-acid split of a merged category table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CcdPartition {
    AminoAcid,
    NonAminoAcid,
}

impl CcdPartition {
    pub const ALL: [CcdPartition; 2] = [CcdPartition::AminoAcid, CcdPartition::NonAminoAcid];

    /// The suffix used in persisted file names, e.g. `ccd-chem_comp-aa.parquet`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            CcdPartition::AminoAcid => "aa",
            CcdPartition::NonAminoAcid => "non_aa",
        }
    }
}

impl fmt::Display for CcdPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Caller-facing variant selection for the CCD accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantSelect {
    Aa,
    NonAa,
    /// Try the amino-acid partition first, then the non-amino-acid one.
    /// Requires an explicit component-id filter; an unfiltered "any" request
    /// is ambiguous.
    #[default]
    Any,
}

impl VariantSelect {
    /// The partitions to try, in order.
    pub fn partitions(self) -> &'static [CcdPartition] {
        match self {
            VariantSelect::Aa => &[CcdPartition::AminoAcid],
            VariantSelect::NonAa => &[CcdPartition::NonAminoAcid],
            VariantSelect::Any => &CcdPartition::ALL,
        }
    }
}

/// Group block of a chemical element, as enumerated by PubChem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupBlock {
    Actinide,
    AlkaliMetal,
    AlkalineEarthMetal,
    Halogen,
    Lanthanide,
    Metalloid,
    NobleGas,
    Nonmetal,
    PostTransitionMetal,
    TransitionMetal,
}

impl GroupBlock {
    pub const ALL: [GroupBlock; 10] = [
        GroupBlock::Actinide,
        GroupBlock::AlkaliMetal,
        GroupBlock::AlkalineEarthMetal,
        GroupBlock::Halogen,
        GroupBlock::Lanthanide,
        GroupBlock::Metalloid,
        GroupBlock::NobleGas,
        GroupBlock::Nonmetal,
        GroupBlock::PostTransitionMetal,
        GroupBlock::TransitionMetal,
    ];

    /// The lowercase form stored in the published table.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupBlock::Actinide => "actinide",
            GroupBlock::AlkaliMetal => "alkali metal",
            GroupBlock::AlkalineEarthMetal => "alkaline earth metal",
            GroupBlock::Halogen => "halogen",
            GroupBlock::Lanthanide => "lanthanide",
            GroupBlock::Metalloid => "metalloid",
            GroupBlock::NobleGas => "noble gas",
            GroupBlock::Nonmetal => "nonmetal",
            GroupBlock::PostTransitionMetal => "post-transition metal",
            GroupBlock::TransitionMetal => "transition metal",
        }
    }
}

impl FromStr for GroupBlock {
    type Err = ();

    /// Case-insensitive match against the fixed 10-value vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        GroupBlock::ALL
            .into_iter()
            .find(|block| block.as_str() == lower)
            .ok_or(())
    }
}

impl fmt::Display for GroupBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard state of an element at room temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardState {
    Solid,
    Liquid,
    Gas,
}

impl StandardState {
    pub fn as_str(self) -> &'static str {
        match self {
            StandardState::Solid => "solid",
            StandardState::Liquid => "liquid",
            StandardState::Gas => "gas",
        }
    }

    /// Classify free text such as `"Expected to be a Solid"`.
    ///
    /// Matches case-insensitively by substring in the priority order
    /// solid, liquid, gas; first match wins. Unmatched text yields `None`
    /// rather than an error.
    pub fn classify(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("solid") {
            Some(StandardState::Solid)
        } else if lower.contains("liquid") {
            Some(StandardState::Liquid)
        } else if lower.contains("gas") {
            Some(StandardState::Gas)
        } else {
            None
        }
    }
}

impl fmt::Display for StandardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
