//! Fixed four-stage plan paced over a minimum display duration while the real
//! upstream calls run. The plan has no data dependency on those calls.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::round_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub number: u8,
    pub title: &'static str,
    pub activities: [&'static str; 6],
}

pub const STAGES: [Stage; 4] = [
    Stage {
        number: 1,
        title: "Open-source Investigation",
        activities: [
            "Geographical Risk Investigation",
            "Industry Risk Investigation",
            "Structure Risk Investigation",
            "Adverse Media Risk Investigation",
            "Sanctions List Check",
            "Politically Exposed Person (PEP)",
        ],
    },
    Stage {
        number: 2,
        title: "Disambiguation & Validation",
        activities: [
            "Cross-Reference Checks",
            "Adverse Media Validation",
            "PEP Validation",
            "Sanctions Hit Validation",
            "Consolidate and Deduplicate",
            "Flag Inconsistencies",
        ],
    },
    Stage {
        number: 3,
        title: "Regulatory Compliance & Risk Assessor",
        activities: [
            "Regulatory Compliance Mapping",
            "Determine Regulatory Flags",
            "Generate Compliance Notes",
            "Assign Weight",
            "Aggregate Scores",
            "Apply Risk Scoring Methodology",
        ],
    },
    Stage {
        number: 4,
        title: "Report Generation & Evidence Locker",
        activities: [
            "Summary Generation",
            "Risk Assessment",
            "Risk Findings",
            "Regulatory Compliance Summary",
            "Evidence Locker Compilation",
            "Report Visualization",
        ],
    },
];

pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(15);

/// State of the plan after `completed` activities have finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub stage_index: usize,
    pub stage_title: &'static str,
    /// Most recently completed activity, `None` before the first tick.
    pub activity: Option<&'static str>,
    pub percent: Decimal,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPlan {
    total: Duration,
}

impl Default for ProgressPlan {
    fn default() -> Self {
        ProgressPlan::new(DEFAULT_DISPLAY_DURATION)
    }
}

impl ProgressPlan {
    pub fn new(total: Duration) -> Self {
        ProgressPlan { total }
    }

    pub fn total_duration(&self) -> Duration {
        self.total
    }

    pub fn total_activities(&self) -> usize {
        STAGES.iter().map(|s| s.activities.len()).sum()
    }

    /// Time between two ticks: the total duration spread evenly over all
    /// activities.
    pub fn tick_interval(&self) -> Duration {
        self.total / self.total_activities() as u32
    }

    pub fn snapshot(&self, completed: usize) -> ProgressSnapshot {
        let total = self.total_activities();
        let completed = completed.min(total);

        let (stage_index, activity) = if completed == 0 {
            (0, None)
        } else {
            locate(completed - 1)
        };

        let percent = round_score(Decimal::from(completed * 100) / Decimal::from(total));

        ProgressSnapshot {
            completed,
            stage_index,
            stage_title: STAGES[stage_index].title,
            activity,
            percent,
            complete: completed >= total,
        }
    }

    /// Snapshots for ticks 1..=N in order.
    pub fn snapshots(&self) -> impl Iterator<Item = ProgressSnapshot> + '_ {
        (1..=self.total_activities()).map(move |n| self.snapshot(n))
    }
}

/// Stage index and activity name for a zero-based global activity index.
fn locate(index: usize) -> (usize, Option<&'static str>) {
    let mut offset = 0;
    for (i, stage) in STAGES.iter().enumerate() {
        if index < offset + stage.activities.len() {
            return (i, Some(stage.activities[index - offset]));
        }
        offset += stage.activities.len();
    }
    let last = STAGES.len() - 1;
    (last, STAGES[last].activities.last().copied())
}
