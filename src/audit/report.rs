//! Lighthouse JSON report model and its reduction to an `AuditOutcome`

use crate::audit::model::{AuditOutcome, CategoryResult, CheckDetail, FailedCheck, NodeGroup};
use crate::audit::AuditError;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Score the tool assigns to a fully passing audit entry
pub const MAX_SCORE: f64 = 100.0;

/// Boilerplate the tool prepends to node failure summaries
const BOILERPLATE_PREFIXES: &[&str] = &["Fix any of the following:", "Fix all of the following:"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LighthouseReport {
    #[serde(default)]
    report_categories: Vec<ReportCategory>,
}

#[derive(Debug, Deserialize)]
struct ReportCategory {
    name: String,
    #[serde(default)]
    audits: Vec<ReportAudit>,
}

#[derive(Debug, Deserialize)]
struct ReportAudit {
    id: String,
    #[serde(default)]
    score: Value,
    #[serde(default)]
    result: ReportAuditResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportAuditResult {
    #[serde(default)]
    description: String,
    #[serde(default)]
    extended_info: Option<ExtendedInfo>,
}

#[derive(Debug, Deserialize)]
struct ExtendedInfo {
    #[serde(default)]
    value: Value,
}

impl ReportAudit {
    fn passed(&self) -> bool {
        self.score.as_f64() == Some(MAX_SCORE)
    }
}

/// Parses raw tool output into a normalized outcome for `url`
///
/// Output that is not a well-formed report is an `AuditError::Parse` that
/// carries the raw text for diagnosis.
pub fn parse_report(url: &Url, output: &str) -> Result<AuditOutcome, AuditError> {
    let report: LighthouseReport =
        serde_json::from_str(output).map_err(|source| AuditError::Parse {
            url: url.to_string(),
            output: output.to_string(),
            source,
        })?;

    Ok(normalize_report(url, report))
}

/// Reduces a parsed report to failed checks, counting perfect scores as passes
fn normalize_report(url: &Url, report: LighthouseReport) -> AuditOutcome {
    let mut passed_audits = 0;
    let mut categories = Vec::with_capacity(report.report_categories.len());

    for category in report.report_categories {
        let mut failed_checks = Vec::new();

        for audit in category.audits {
            if audit.passed() {
                passed_audits += 1;
                continue;
            }

            let detail = match audit.result.extended_info {
                Some(info) => classify_extended_info(&info.value),
                None => CheckDetail::CountOnly,
            };

            failed_checks.push(FailedCheck {
                id: audit.id,
                description: audit.result.description,
                detail,
            });
        }

        categories.push(CategoryResult {
            name: category.name,
            failed_checks,
        });
    }

    AuditOutcome {
        url: url.clone(),
        categories,
        passed_audits,
    }
}

/// Works out which of the known extended-info shapes `value` has
fn classify_extended_info(value: &Value) -> CheckDetail {
    if let Some(entries) = value.as_array() {
        let urls = entries
            .iter()
            .filter_map(|entry| entry.get("url").and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        return CheckDetail::Resources(urls);
    }

    if let Some(nodes) = value.get("nodes").and_then(Value::as_array) {
        return CheckDetail::NodeGroups(group_nodes(nodes));
    }

    CheckDetail::CountOnly
}

/// Groups node records by their stripped failure message, keeping first-seen order
fn group_nodes(nodes: &[Value]) -> Vec<NodeGroup> {
    let mut groups: Vec<NodeGroup> = Vec::new();

    for node in nodes {
        let summary = node
            .get("failureSummary")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let message = strip_boilerplate(summary);
        let html = node
            .get("html")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match groups.iter_mut().find(|g| g.message == message) {
            Some(group) => group.nodes.push(html),
            None => groups.push(NodeGroup {
                message,
                nodes: vec![html],
            }),
        }
    }

    groups
}

/// Removes the tool's leading "Fix any of the following:" style boilerplate
///
/// # Examples
///
/// ```
/// use lumen_sweep::audit::strip_boilerplate;
///
/// assert_eq!(
///     strip_boilerplate("Fix any of the following: missing alt text"),
///     "missing alt text"
/// );
/// ```
pub fn strip_boilerplate(summary: &str) -> String {
    let trimmed = summary.trim_start();
    let stripped = BOILERPLATE_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    stripped.trim().to_string()
}
