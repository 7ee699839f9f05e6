//! Core types for the log analysis gateway
//! this crate holds the report shape returned by the model and the line
//! truncation applied to uploads before they are sent anywhere.
pub mod excerpt;

pub use excerpt::{LogExcerpt, MAX_LINES};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ANOMALY KIND //

/// Severity class of a flagged log event.
/// Only these three values are accepted from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Info,
    Warning,
    Error,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ANOMALY

/// One flagged event from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,

    pub timestamp: String, // "N/A" when the source line carries none

    pub message: String,
}

// ANALYSIS REPORT (what the caller receives)

/// Full result of analysing one log file.
/// `anomalies` keeps the order the model returned, which is its relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisReport {
    pub summary: String,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to parse model output as an analysis report: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-severity tally of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl AnalysisReport {
    /// Strictly parse the raw text produced by the model.
    ///
    /// Missing fields, extra fields, wrong types and unknown anomaly types
    /// are all rejected; nothing is defaulted or dropped.
    pub fn from_model_output(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn count_by_kind(&self) -> KindCounts {
        self.anomalies
            .iter()
            .fold(KindCounts::default(), |mut counts, anomaly| {
                match anomaly.kind {
                    AnomalyKind::Info => counts.info += 1,
                    AnomalyKind::Warning => counts.warning += 1,
                    AnomalyKind::Error => counts.error += 1,
                }
                counts
            })
    }
}
