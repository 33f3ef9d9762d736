//! Per-page HTML fragments
//!
//! Every piece of text that came from the audit tool or the crawled site is
//! entity-escaped before it reaches the document.

use crate::audit::{AuditError, AuditOutcome, CheckDetail, FailedCheck, NodeGroup};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;
use url::Url;

/// The rendered section for one page; never modified once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFragment(String);

impl PageFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Renders the section for a page whose audit completed
pub fn render_page(outcome: &AuditOutcome) -> PageFragment {
    let mut out = String::new();
    open_section(&mut out, &outcome.url);

    for category in outcome.failing_categories() {
        let _ = write!(
            out,
            r#"<h3 class="audit-category">{}</h3>"#,
            encode_text(&category.name)
        );
        for check in &category.failed_checks {
            render_check(&mut out, check);
        }
    }

    out.push_str("</div>");
    PageFragment(out)
}

/// Renders the section for a page whose audit could not be completed
pub fn render_failed_page(url: &Url, error: &AuditError) -> PageFragment {
    let mut out = String::new();
    open_section(&mut out, url);
    let _ = write!(
        out,
        r#"<div class="audit audit-error"><p><strong>audit-failed</strong> - {}</p></div>"#,
        encode_text(&error.to_string())
    );
    out.push_str("</div>");
    PageFragment(out)
}

fn open_section(out: &mut String, url: &Url) {
    let _ = write!(
        out,
        r#"<div class="audit-url-result"><h2 class="audit-url"><a href="{}">{}</a></h2>"#,
        encode_double_quoted_attribute(url.as_str()),
        encode_text(url.as_str())
    );
}

fn render_check(out: &mut String, check: &FailedCheck) {
    out.push_str(r#"<div class="audit">"#);
    let _ = write!(
        out,
        r#"<div class="audit-description"><p><strong>{}</strong> - {}</p></div>"#,
        encode_text(&check.id),
        encode_text(&check.description)
    );

    match &check.detail {
        CheckDetail::Resources(urls) => {
            out.push_str(r#"<div class="extended-info"><h3>Extended Info</h3><ul>"#);
            for url in urls {
                let _ = write!(out, "<li>{}</li>", encode_text(url));
            }
            out.push_str("</ul></div>");
        }
        CheckDetail::NodeGroups(groups) => {
            out.push_str(r#"<div class="audit-node-messages"><ul>"#);
            for group in groups {
                render_node_group(out, group);
            }
            out.push_str("</ul></div>");
        }
        CheckDetail::CountOnly => {}
    }

    out.push_str("</div>");
}

fn render_node_group(out: &mut String, group: &NodeGroup) {
    let _ = write!(
        out,
        "<li><strong>{}.</strong><ul>",
        nl2br(&encode_text(&group.message))
    );
    for node in &group.nodes {
        let _ = write!(out, "<li>{}</li>", encode_text(node));
    }
    out.push_str("</ul></li>");
}

/// Turns line breaks into `<br>` tags; the input must already be escaped
fn nl2br(escaped: &str) -> String {
    escaped
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br>\n")
}
