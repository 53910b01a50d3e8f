//! Report normalization: category score extraction and performance
//! classification.
//!
//! Only `categories.<id>.score` is read from the Lighthouse report;
//! everything else in the document is ignored.

use serde::Serialize;
use serde_json::Value;

use crate::errors::AuditError;

/// Category identifiers as they appear in the Lighthouse report, in the
/// order they are requested from the tool.
pub const CATEGORY_IDS: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];

pub const SUMMARY_EXCELLENT: &str = "[OK] Excellent performance";
pub const SUMMARY_NEEDS_IMPROVEMENT: &str = "[!] Needs improvement";
pub const SUMMARY_POOR: &str = "[X] Poor performance";

/// Raw performance score at or above this is classified excellent.
pub const EXCELLENT_THRESHOLD: f64 = 0.90;
/// Raw performance score at or above this (but below excellent) still
/// needs improvement; anything lower is poor.
pub const IMPROVEMENT_THRESHOLD: f64 = 0.50;

/// Integer percentages for the four tracked categories. A category the
/// report omits (or scores as `null`) is 0, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub performance: u32,
    pub accessibility: u32,
    pub best_practices: u32,
    pub seo: u32,
}

/// Success shape of one audit pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub url: String,
    pub scores: CategoryScores,
    pub summary: &'static str,
}

/// Error shape of one audit pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

/// Exactly one of the two output shapes; they are never merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AuditOutcome {
    Report(AuditReport),
    Failure(AuditFailure),
}

impl From<Result<AuditReport, AuditError>> for AuditOutcome {
    fn from(result: Result<AuditReport, AuditError>) -> Self {
        match result {
            Ok(report) => AuditOutcome::Report(report),
            Err(err) => AuditOutcome::Failure(AuditFailure::from(&err)),
        }
    }
}

impl From<&AuditError> for AuditFailure {
    fn from(err: &AuditError) -> Self {
        AuditFailure {
            error: err.to_string(),
            stderr: err.stderr().map(str::to_string),
        }
    }
}

/// Convert a raw category score in [0,1] to an integer percentage,
/// truncating toward zero. Absent and `null` scores map to 0.
pub fn score_to_percent(raw: Option<f64>) -> u32 {
    match raw {
        Some(score) => (score * 100.0) as u32,
        None => 0,
    }
}

/// Classify overall performance from the raw (pre-rounding)
/// performance score.
pub fn classify(raw_performance: Option<f64>) -> &'static str {
    let score = raw_performance.unwrap_or(0.0);
    if score >= EXCELLENT_THRESHOLD {
        SUMMARY_EXCELLENT
    } else if score >= IMPROVEMENT_THRESHOLD {
        SUMMARY_NEEDS_IMPROVEMENT
    } else {
        SUMMARY_POOR
    }
}

/// Normalize a parsed Lighthouse report into the success shape.
pub fn normalize(url: &str, report: &Value) -> AuditReport {
    let empty = Value::Null;
    let categories = report.get("categories").unwrap_or(&empty);
    let raw_performance = category_score(categories, "performance");

    AuditReport {
        url: url.to_string(),
        scores: CategoryScores {
            performance: score_to_percent(raw_performance),
            accessibility: score_to_percent(category_score(categories, "accessibility")),
            best_practices: score_to_percent(category_score(categories, "best-practices")),
            seo: score_to_percent(category_score(categories, "seo")),
        },
        summary: classify(raw_performance),
    }
}

fn category_score(categories: &Value, id: &str) -> Option<f64> {
    categories.get(id)?.get("score")?.as_f64()
}
