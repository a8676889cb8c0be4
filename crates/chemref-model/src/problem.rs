//! Problem record accumulated by one curation run.
//!
//! The curation pipeline is best-effort: validation failures, duplicate
//! rows, and merge conflicts never abort a run. They are collected here,
//! keyed by stage and category, and returned to the caller alongside the
//! curated tables. A problem record is never persisted as primary data.

use std::collections::BTreeMap;
use std::fmt;

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::category::CcdCategory;
use crate::enums::DictVariant;

/// The curation stage a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ProblemStage {
    /// Validation of the main dictionary.
    Main,
    /// Validation of the protonation-variants dictionary.
    Protonation,
    /// Cross-dictionary merge.
    Merge,
}

impl From<DictVariant> for ProblemStage {
    fn from(variant: DictVariant) -> Self {
        match variant {
            DictVariant::Main => ProblemStage::Main,
            DictVariant::Protonation => ProblemStage::Protonation,
        }
    }
}

impl fmt::Display for ProblemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemStage::Main => "main",
            ProblemStage::Protonation => "protonation",
            ProblemStage::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// A single schema-validation finding for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub column: String,
    pub detail: String,
    /// Number of affected rows, where the issue is row-scoped.
    pub rows: usize,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({} rows)", self.column, self.detail, self.rows)
    }
}

/// One conflicting cell found while merging the two dictionaries.
///
/// The main dictionary's value is the one retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeConflict {
    /// Composite identity-key value of the conflicting row.
    pub key: String,
    pub column: String,
    pub main: String,
    pub protonation: String,
}

/// Problems found in one category at one stage.
#[derive(Debug, Clone, Default)]
pub struct CategoryProblems {
    pub validation: Vec<ValidationIssue>,
    /// Rows removed during deduplication (first occurrence kept).
    pub duplicates: Option<DataFrame>,
    pub conflicts: Vec<MergeConflict>,
}

impl CategoryProblems {
    pub fn is_empty(&self) -> bool {
        self.validation.is_empty()
            && self.conflicts.is_empty()
            && self.duplicates.as_ref().is_none_or(|df| df.height() == 0)
    }

    fn issue_count(&self) -> usize {
        self.validation.len()
            + self.conflicts.len()
            + self.duplicates.as_ref().map_or(0, DataFrame::height)
    }
}

/// Per-category issue counts, suitable for logging and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemSummaryEntry {
    pub stage: ProblemStage,
    pub category: CcdCategory,
    pub validation_issues: usize,
    pub duplicate_rows: usize,
    pub merge_conflicts: usize,
}

/// Diagnostics accumulated during one curation run, keyed by stage then
/// category.
#[derive(Debug, Clone, Default)]
pub struct ProblemRecord {
    stages: BTreeMap<ProblemStage, BTreeMap<CcdCategory, CategoryProblems>>,
}

impl ProblemRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_validation(
        &mut self,
        variant: DictVariant,
        category: CcdCategory,
        issues: Vec<ValidationIssue>,
    ) {
        if issues.is_empty() {
            return;
        }
        self.entry(variant.into(), category).validation.extend(issues);
    }

    pub fn record_duplicates(
        &mut self,
        variant: DictVariant,
        category: CcdCategory,
        removed: DataFrame,
    ) {
        if removed.height() == 0 {
            return;
        }
        self.entry(variant.into(), category).duplicates = Some(removed);
    }

    pub fn record_conflicts(&mut self, category: CcdCategory, conflicts: Vec<MergeConflict>) {
        if conflicts.is_empty() {
            return;
        }
        self.entry(ProblemStage::Merge, category)
            .conflicts
            .extend(conflicts);
    }

    pub fn get(&self, stage: ProblemStage, category: CcdCategory) -> Option<&CategoryProblems> {
        self.stages.get(&stage).and_then(|cats| cats.get(&category))
    }

    pub fn is_empty(&self) -> bool {
        self.stages
            .values()
            .all(|cats| cats.values().all(CategoryProblems::is_empty))
    }

    /// Total number of individual findings across all stages.
    pub fn issue_count(&self) -> usize {
        self.stages
            .values()
            .flat_map(|cats| cats.values())
            .map(CategoryProblems::issue_count)
            .sum()
    }

    /// Flat per-category summary, in stage/category order.
    pub fn summary(&self) -> Vec<ProblemSummaryEntry> {
        self.stages
            .iter()
            .flat_map(|(stage, cats)| {
                cats.iter().map(|(category, problems)| ProblemSummaryEntry {
                    stage: *stage,
                    category: *category,
                    validation_issues: problems.validation.len(),
                    duplicate_rows: problems.duplicates.as_ref().map_or(0, DataFrame::height),
                    merge_conflicts: problems.conflicts.len(),
                })
            })
            .collect()
    }

    fn entry(&mut self, stage: ProblemStage, category: CcdCategory) -> &mut CategoryProblems {
        self.stages
            .entry(stage)
            .or_default()
            .entry(category)
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, NamedFrom, Series};

    fn one_row_df() -> DataFrame {
        let col: Column = Series::new("id".into(), &["ATP"]).into();
        DataFrame::new(vec![col]).unwrap()
    }

    #[test]
    fn test_empty_record() {
        let record = ProblemRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.issue_count(), 0);
        assert!(record.summary().is_empty());
    }

    #[test]
    fn test_empty_inputs_are_not_recorded() {
        let mut record = ProblemRecord::new();
        record.record_validation(DictVariant::Main, CcdCategory::ChemComp, Vec::new());
        record.record_conflicts(CcdCategory::ChemComp, Vec::new());
        assert!(record.is_empty());
    }

    #[test]
    fn test_stage_and_category_keys() {
        let mut record = ProblemRecord::new();
        record.record_duplicates(
            DictVariant::Protonation,
            CcdCategory::ChemCompAtom,
            one_row_df(),
        );
        record.record_conflicts(
            CcdCategory::ChemComp,
            vec![MergeConflict {
                key: "ATP".to_string(),
                column: "name".to_string(),
                main: "a".to_string(),
                protonation: "b".to_string(),
            }],
        );

        assert!(!record.is_empty());
        assert_eq!(record.issue_count(), 2);
        assert!(
            record
                .get(ProblemStage::Protonation, CcdCategory::ChemCompAtom)
                .is_some()
        );
        assert!(record.get(ProblemStage::Main, CcdCategory::ChemComp).is_none());

        let summary = record.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].stage, ProblemStage::Protonation);
        assert_eq!(summary[0].duplicate_rows, 1);
        assert_eq!(summary[1].stage, ProblemStage::Merge);
        assert_eq!(summary[1].merge_conflicts, 1);
    }
}
