//! Step and pipeline outcomes, and the end-of-run summary.

use serde::Serialize;

use crate::error::InstallError;
use crate::installer::Dependency;
use crate::platform::Os;

/// Result of one step (or of a whole pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing had to be done; the string says why
    Skipped(String),
    Succeeded,
    Failed(InstallError),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }

    /// Keep the first failure of a sequence of steps.
    pub fn then(self, next: StepOutcome) -> StepOutcome {
        match self {
            StepOutcome::Failed(_) => self,
            _ => next,
        }
    }
}

/// Outcome of one dependency pipeline on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub dependency: Dependency,
    pub os: Os,
    pub outcome: StepOutcome,
}

/// Serialized form of a [`PipelineReport`].
#[derive(Debug, Serialize)]
struct ReportEntry {
    dependency: Dependency,
    os: Os,
    status: &'static str,
    detail: Option<String>,
}

impl From<&PipelineReport> for ReportEntry {
    fn from(report: &PipelineReport) -> Self {
        let (status, detail) = match &report.outcome {
            StepOutcome::Skipped(reason) => ("skipped", Some(reason.clone())),
            StepOutcome::Succeeded => ("installed", None),
            StepOutcome::Failed(e) => ("failed", Some(e.to_string())),
        };
        Self {
            dependency: report.dependency,
            os: report.os,
            status,
            detail,
        }
    }
}

/// All pipeline reports of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub reports: Vec<PipelineReport>,
}

impl Summary {
    pub fn push(&mut self, dependency: Dependency, os: Os, outcome: StepOutcome) {
        self.reports.push(PipelineReport {
            dependency,
            os,
            outcome,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_failed()).count()
    }

    /// Human readable lines, one per pipeline.
    pub fn lines(&self) -> Vec<String> {
        self.reports
            .iter()
            .map(|r| {
                let status = match &r.outcome {
                    StepOutcome::Skipped(reason) => format!("skipped ({})", reason),
                    StepOutcome::Succeeded => "installed".to_string(),
                    StepOutcome::Failed(e) => format!("failed: {}", e),
                };
                format!("  {} ({}): {}", r.dependency, r.os, status)
            })
            .collect()
    }

    pub fn print(&self) {
        if self.is_empty() {
            return;
        }
        println!();
        println!("Summary:");
        for line in self.lines() {
            println!("{}", line);
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let entries: Vec<ReportEntry> = self.reports.iter().map(ReportEntry::from).collect();
        serde_json::to_string_pretty(&entries)
    }
}
