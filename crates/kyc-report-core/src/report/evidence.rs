use serde::{Deserialize, Serialize};

use crate::assessment::categories::RiskCategoryKey;
use crate::assessment::findings::Finding;
use crate::types::EvidenceSource;

/// Real evidence collected for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceGroup {
    pub key: RiskCategoryKey,
    pub category: String,
    pub sources: Vec<EvidenceSource>,
}

/// Group non-placeholder sources by category, in finding order. Categories
/// without real evidence are left out entirely.
pub fn build_evidence_locker(findings: &[Finding]) -> Vec<EvidenceGroup> {
    findings
        .iter()
        .filter_map(|f| {
            let sources: Vec<EvidenceSource> = f
                .evidence_sources
                .iter()
                .filter(|s| !s.is_placeholder())
                .cloned()
                .collect();
            if sources.is_empty() {
                None
            } else {
                Some(EvidenceGroup {
                    key: f.key,
                    category: f.category.clone(),
                    sources,
                })
            }
        })
        .collect()
}

/// Total number of sources across all groups.
pub fn evidence_count(locker: &[EvidenceGroup]) -> usize {
    locker.iter().map(|g| g.sources.len()).sum()
}
