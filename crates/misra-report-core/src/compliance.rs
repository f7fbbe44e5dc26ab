//! Compliance aggregation against the rule catalog.
//!
//! Joins the flattened violation records with the catalog: every catalog rule
//! gets a violation count (zero included), and each category tracks the set of
//! distinct rules violated at least once. Compliance is a binary call: any
//! violated Mandatory or Required rule makes the run Noncompliant.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::catalog::{RuleCatalog, RuleCategory};
use crate::violations::ViolationRecord;

/// Namespace prefix cppcheck puts on MISRA C:2012 check ids.
pub const MISRA_PREFIX: &str = "misra-c2012-";

/// Overall pass/fail determination for the audited code base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    /// No Mandatory or Required guideline was violated.
    Compliant,
    /// At least one Mandatory or Required guideline was violated.
    Noncompliant,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compliant => write!(f, "Compliant"),
            Self::Noncompliant => write!(f, "Noncompliant"),
        }
    }
}

/// One row of the per-rule compliance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineCount {
    /// Guideline label, e.g. `Rule 1.1`.
    pub guideline: String,
    /// Compliance category of the guideline.
    pub category: RuleCategory,
    /// Number of violations recorded against it.
    pub violations: usize,
}

/// Violation counts per catalog rule plus per-category violated-rule sets.
#[derive(Debug, Clone)]
pub struct ComplianceTally {
    /// Count per catalog rule id. Every catalog id is present.
    counts: HashMap<String, usize>,
    /// Catalog ids in insertion order, for stable table output.
    order: Vec<(String, RuleCategory)>,
    /// Distinct violated rule ids per category.
    violated: HashMap<RuleCategory, BTreeSet<String>>,
}

impl ComplianceTally {
    /// Tallies violation records against the catalog.
    ///
    /// Records whose id does not start with [`MISRA_PREFIX`], or whose
    /// suffix is not a catalog rule, are excluded from the tally. That is
    /// deliberate: analyzer output routinely carries general checks outside
    /// the tracked guideline set.
    #[must_use]
    pub fn tally(catalog: &RuleCatalog, records: &[ViolationRecord]) -> Self {
        let mut counts: HashMap<String, usize> =
            catalog.iter().map(|e| (e.id.clone(), 0)).collect();
        let order: Vec<(String, RuleCategory)> =
            catalog.iter().map(|e| (e.id.clone(), e.category)).collect();
        let mut violated: HashMap<RuleCategory, BTreeSet<String>> = RuleCategory::ALL
            .iter()
            .map(|&c| (c, BTreeSet::new()))
            .collect();

        for record in records {
            let Some(rule_id) = record.id.strip_prefix(MISRA_PREFIX) else {
                continue;
            };
            let Some(entry) = catalog.get(rule_id) else {
                tracing::debug!("Violation id {} not in catalog, excluded", record.id);
                continue;
            };
            if let Some(count) = counts.get_mut(rule_id) {
                *count += 1;
            }
            if let Some(set) = violated.get_mut(&entry.category) {
                set.insert(rule_id.to_string());
            }
        }

        Self {
            counts,
            order,
            violated,
        }
    }

    /// Violation count for a catalog rule, `None` for ids outside the catalog.
    #[must_use]
    pub fn count(&self, rule_id: &str) -> Option<usize> {
        self.counts.get(rule_id).copied()
    }

    /// Distinct rules violated in the given category.
    #[must_use]
    pub fn violated_rules(&self, category: RuleCategory) -> &BTreeSet<String> {
        // Populated for every category in `tally`.
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.violated.get(&category).unwrap_or(&EMPTY)
    }

    /// Number of distinct rules violated in the given category.
    #[must_use]
    pub fn distinct_violations(&self, category: RuleCategory) -> usize {
        self.violated_rules(category).len()
    }

    /// Overall compliance determination.
    #[must_use]
    pub fn status(&self) -> ComplianceStatus {
        let critical = self.distinct_violations(RuleCategory::Mandatory)
            + self.distinct_violations(RuleCategory::Required);
        if critical == 0 {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::Noncompliant
        }
    }

    /// Per-rule table rows in catalog insertion order.
    #[must_use]
    pub fn rows(&self) -> Vec<GuidelineCount> {
        self.order
            .iter()
            .map(|(id, category)| GuidelineCount {
                guideline: format!("Rule {id}"),
                category: *category,
                violations: self.counts.get(id).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Number of rules tracked by the tally.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.order.len()
    }
}
