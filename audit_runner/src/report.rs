//! Run report: one row per check plus totals

use audit_comparators::logging::codes;
use audit_comparators::{ComparatorError, Verdict};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Row status; `error` means the rule itself could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    NotApplicable,
    Error,
}

impl CheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::NotApplicable => "N/A",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub fixture: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckReport {
    pub fn from_result(
        fixture: &str,
        id: &str,
        description: Option<&str>,
        result: Result<Verdict, ComparatorError>,
    ) -> Self {
        let (status, message) = match result {
            Ok(verdict) => {
                let status = match verdict.outcome {
                    audit_comparators::Outcome::Passed => CheckStatus::Passed,
                    audit_comparators::Outcome::Failed => CheckStatus::Failed,
                    audit_comparators::Outcome::NotApplicable => CheckStatus::NotApplicable,
                };
                (status, verdict.message)
            }
            Err(e) => {
                let code = e.code();
                (
                    CheckStatus::Error,
                    format!("[{}] {}: {}", code, codes::get_description(code), e),
                )
            }
        };

        Self {
            fixture: fixture.to_string(),
            id: id.to_string(),
            description: description.map(str::to_string),
            status,
            message,
        }
    }

    /// Fixture-level failure (unreadable or malformed file)
    pub fn fixture_error(fixture: &str, message: String) -> Self {
        Self {
            fixture: fixture.to_string(),
            id: "-".to_string(),
            description: None,
            status: CheckStatus::Error,
            message,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_applicable: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub summary: ReportSummary,
    pub checks: Vec<CheckReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            summary: ReportSummary::default(),
            checks: Vec::new(),
        }
    }

    pub fn push(&mut self, check: CheckReport) {
        self.summary.total += 1;
        match check.status {
            CheckStatus::Passed => self.summary.passed += 1,
            CheckStatus::Failed => self.summary.failed += 1,
            CheckStatus::NotApplicable => self.summary.not_applicable += 1,
            CheckStatus::Error => self.summary.errors += 1,
        }
        self.checks.push(check);
    }

    /// True when nothing failed and nothing errored
    pub fn is_clean(&self) -> bool {
        self.summary.failed == 0 && self.summary.errors == 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for check in &self.checks {
            out.push_str(&format!(
                "[{}] {} ({})",
                check.status.label(),
                check.id,
                check.fixture
            ));
            if let Some(description) = &check.description {
                out.push_str(&format!(" - {}", description));
            }
            out.push('\n');
            if check.status != CheckStatus::Passed {
                out.push_str(&format!("      {}\n", check.message));
            }
        }

        out.push_str(&format!(
            "\nAudit Summary ({}):\n\
             Total Checks: {}\n\
             Passed: {}\n\
             Not Applicable: {}\n\
             Failed: {}\n\
             Errors: {}\n",
            self.timestamp.to_rfc3339(),
            self.summary.total,
            self.summary.passed,
            self.summary.not_applicable,
            self.summary.failed,
            self.summary.errors
        ));
        out
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_clean_state() {
        let mut report = RunReport::new();
        report.push(CheckReport::from_result("f.json", "a", None, Ok(Verdict::check_passed())));
        report.push(CheckReport::from_result(
            "f.json",
            "b",
            None,
            Ok(Verdict::not_applicable("Check Passed. absent")),
        ));
        assert!(report.is_clean());

        report.push(CheckReport::from_result(
            "f.json",
            "c",
            Some("bad rule"),
            Err(ComparatorError::UnknownComparator("regex".to_string())),
        ));
        assert!(!report.is_clean());
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.not_applicable, 1);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(
            report.checks[2].message,
            "[CMP003] Comparator registry failure: No comparator registered for type 'regex'"
        );
    }

    #[test]
    fn test_text_and_json_output() {
        let mut report = RunReport::new();
        report.push(CheckReport::from_result(
            "f.json",
            "size-check",
            Some("at least two"),
            Ok(Verdict::fail("list::size failure. Expected=>= 2 Got=1")),
        ));

        let text = report.to_text();
        assert!(text.contains("[FAIL] size-check (f.json) - at least two"));
        assert!(text.contains("list::size failure"));
        assert!(text.contains("Failed: 1"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["checks"][0]["status"], "failed");
        assert_eq!(json["summary"]["failed"], 1);
        assert!(json["timestamp"].is_string());
    }
}
