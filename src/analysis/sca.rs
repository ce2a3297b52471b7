//! cppcheck XML result analysis

use crate::core::{MarkerCounts, MarkerRule};
use serde::Serialize;

/// Bucket for error lines matching none of the known categories
pub const OTHERS: &str = "others";

/// Error categories in report order, with their display label
pub const CATEGORIES: [(&str, &str); 9] = [
    ("uninitvar", "Uninitialized variable"),
    ("uninitStructMember", "Uninitialized struct member"),
    ("memleak", "Memory leak"),
    ("doubleFree", "Memory is freed twice"),
    ("resourceLeak", "Resource leak"),
    ("nullPointer", "Possible null pointer dereference"),
    ("arrayIndexOutOfBounds", "Array access  out of bounds"),
    ("bufferAccessOutOfBounds", "Buffer is accessed out of bounds"),
    ("unknownEvaluationOrder", "Expression depends on order of evaluation of side effects"),
];

/// Counts of a cppcheck run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaSummary {
    pub errors: usize,
    pub warnings: usize,
    /// Error lines per category, [`OTHERS`] included
    pub categories: MarkerCounts,
}

impl ScaSummary {
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    pub fn category(&self, name: &str) -> usize {
        self.categories.count(name)
    }
}

fn category_rules() -> Vec<MarkerRule> {
    CATEGORIES
        .iter()
        .map(|&(id, _)| MarkerRule::simple(id, id))
        .collect()
}

/// Scan `cppcheck.xml` line by line.
///
/// Each error line lands in exactly one category (the first that matches),
/// so the category counts always add up to the error total.
pub fn analyze_cppcheck(xml: &str) -> ScaSummary {
    let rules = category_rules();
    let mut summary = ScaSummary::default();

    for line in xml.lines() {
        if line.contains("severity=\"warning\"") {
            summary.warnings += 1;
        }
        if line.contains("severity=\"error\"") {
            summary.errors += 1;
            if summary.categories.classify(&rules, line).is_none() {
                summary.categories.bump(OTHERS);
            }
        }
    }

    summary
}
