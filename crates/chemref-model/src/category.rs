//! Closed enumeration of the supported CCD categories.
//!
//! Each variant carries its mmCIF category name, the column that identifies
//! the parent chemical component, and (where the dictionary defines one) the
//! ordered identity-key column list used for deduplication and merging.
//! Categories without a fixed identity key fall back to all columns shared
//! across source dictionaries at curation time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A category table of the PDB Chemical Component Dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CcdCategory {
    ChemComp,
    ChemCompAtom,
    ChemCompBond,
    PdbxChemCompAtomRelated,
    PdbxChemCompAudit,
    PdbxChemCompDescriptor,
    PdbxChemCompFeature,
    PdbxChemCompIdentifier,
    PdbxChemCompPcm,
    PdbxChemCompRelated,
    PdbxChemCompSynonyms,
}

impl CcdCategory {
    /// All supported categories, in dictionary order.
    pub const ALL: [CcdCategory; 11] = [
        CcdCategory::ChemComp,
        CcdCategory::ChemCompAtom,
        CcdCategory::ChemCompBond,
        CcdCategory::PdbxChemCompAtomRelated,
        CcdCategory::PdbxChemCompAudit,
        CcdCategory::PdbxChemCompDescriptor,
        CcdCategory::PdbxChemCompFeature,
        CcdCategory::PdbxChemCompIdentifier,
        CcdCategory::PdbxChemCompPcm,
        CcdCategory::PdbxChemCompRelated,
        CcdCategory::PdbxChemCompSynonyms,
    ];

    /// The mmCIF category name, e.g. `chem_comp_atom`.
    pub fn name(self) -> &'static str {
        match self {
            CcdCategory::ChemComp => "chem_comp",
            CcdCategory::ChemCompAtom => "chem_comp_atom",
            CcdCategory::ChemCompBond => "chem_comp_bond",
            CcdCategory::PdbxChemCompAtomRelated => "pdbx_chem_comp_atom_related",
            CcdCategory::PdbxChemCompAudit => "pdbx_chem_comp_audit",
            CcdCategory::PdbxChemCompDescriptor => "pdbx_chem_comp_descriptor",
            CcdCategory::PdbxChemCompFeature => "pdbx_chem_comp_feature",
            CcdCategory::PdbxChemCompIdentifier => "pdbx_chem_comp_identifier",
            CcdCategory::PdbxChemCompPcm => "pdbx_chem_comp_pcm",
            CcdCategory::PdbxChemCompRelated => "pdbx_chem_comp_related",
            CcdCategory::PdbxChemCompSynonyms => "pdbx_chem_comp_synonyms",
        }
    }

    /// Look up a category by its mmCIF name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cat| cat.name() == name)
    }

    /// The column holding the component identifier.
    ///
    /// `chem_comp` is the component table itself and uses `id`; every other
    /// category references the component through `comp_id`.
    pub fn id_column(self) -> &'static str {
        match self {
            CcdCategory::ChemComp => "id",
            _ => "comp_id",
        }
    }

    /// The ordered identity-key column list, where the dictionary fixes one.
    ///
    /// Returns `None` for categories whose rows are only identified by their
    /// full column set; the curator then uses the columns shared across both
    /// source dictionaries.
    pub fn identity_key(self) -> Option<&'static [&'static str]> {
        match self {
            CcdCategory::ChemComp => Some(&["id"]),
            CcdCategory::ChemCompAtom => Some(&["comp_id", "atom_id"]),
            CcdCategory::ChemCompBond => Some(&["comp_id", "atom_id_1", "atom_id_2"]),
            CcdCategory::PdbxChemCompAtomRelated => {
                Some(&["comp_id", "atom_id", "related_comp_id", "related_atom_id"])
            }
            CcdCategory::PdbxChemCompPcm => Some(&["comp_id", "pcm_id"]),
            CcdCategory::PdbxChemCompSynonyms => Some(&["comp_id", "ordinal"]),
            _ => None,
        }
    }
}

impl fmt::Display for CcdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for cat in CcdCategory::ALL {
            assert_eq!(CcdCategory::from_name(cat.name()), Some(cat));
        }
        assert_eq!(CcdCategory::from_name("invalid_category"), None);
    }

    #[test]
    fn test_id_column() {
        assert_eq!(CcdCategory::ChemComp.id_column(), "id");
        assert_eq!(CcdCategory::ChemCompAtom.id_column(), "comp_id");
        assert_eq!(CcdCategory::PdbxChemCompSynonyms.id_column(), "comp_id");
    }

    #[test]
    fn test_identity_keys_start_with_id_column() {
        for cat in CcdCategory::ALL {
            if let Some(key) = cat.identity_key() {
                assert_eq!(key[0], cat.id_column(), "category {cat}");
            }
        }
    }
}
