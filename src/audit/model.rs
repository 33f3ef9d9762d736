use url::Url;

/// The normalized result of auditing one page
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    /// The audited page
    pub url: Url,

    /// Categories in report order; only failed checks are kept
    pub categories: Vec<CategoryResult>,

    /// Number of audit entries that reached the maximum score
    pub passed_audits: u64,
}

impl AuditOutcome {
    /// Total violations across every category of this page
    pub fn violation_count(&self) -> u64 {
        self.categories.iter().map(CategoryResult::violation_count).sum()
    }

    /// Categories that have at least one failed check
    pub fn failing_categories(&self) -> impl Iterator<Item = &CategoryResult> {
        self.categories.iter().filter(|c| !c.failed_checks.is_empty())
    }
}

/// One audit category (e.g. "Accessibility") applied to a page
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryResult {
    pub name: String,
    pub failed_checks: Vec<FailedCheck>,
}

impl CategoryResult {
    pub fn violation_count(&self) -> u64 {
        self.failed_checks.iter().map(FailedCheck::violation_count).sum()
    }
}

/// One failing rule within a category
#[derive(Debug, Clone, PartialEq)]
pub struct FailedCheck {
    pub id: String,
    pub description: String,
    pub detail: CheckDetail,
}

impl FailedCheck {
    /// How much this check adds to its category's violation counter
    ///
    /// A failed check always counts at least once, even when its extended
    /// info lists nothing.
    pub fn violation_count(&self) -> u64 {
        let listed = match &self.detail {
            CheckDetail::Resources(urls) => urls.len() as u64,
            CheckDetail::NodeGroups(groups) => groups.iter().map(|g| g.nodes.len() as u64).sum(),
            CheckDetail::CountOnly => 1,
        };
        listed.max(1)
    }
}

/// What a failed check carries besides its description
#[derive(Debug, Clone, PartialEq)]
pub enum CheckDetail {
    /// Offending resource URLs
    Resources(Vec<String>),

    /// Offending DOM nodes grouped by failure message, in first-seen order
    NodeGroups(Vec<NodeGroup>),

    /// Nothing to list; the check counts as a single violation
    CountOnly,
}

/// DOM nodes sharing one failure message
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGroup {
    pub message: String,
    pub nodes: Vec<String>,
}
