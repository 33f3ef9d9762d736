//! Report document assembly and persistence

use crate::output::html::PageFragment;
use crate::output::{OutputError, OutputResult};
use std::path::Path;

/// Document title
pub const REPORT_TITLE: &str = "Lighthouse Report";

/// Top-level heading above the per-page sections
pub const REPORT_HEADING: &str = "Accessibility Scan Results";

const STYLE: &str = concat!(
    "body { font-family: roboto; font-size: 14px; } ",
    "a { color: #1a6dd8; } a:hover { color: #0c4896 } a:visited { color: #1a6dd8; } ",
    "h1,h2 { padding: 1em 0; } h1 { font-size: 1.5em; } h2 { font-size: 1.25em; } ",
    ".audit-url-result { padding: 2em 0; border-bottom: 1px solid #efefef; } ",
    ".audit-node-messages ul li ul { margin: 0; padding: 0; list-style: none; } ",
    ".audit-node-messages ul li ul li { display: block; font-family: \"droid sans mono\"; ",
    "width: fit-content; font-size: 0.8em; list-style-type: none; margin: 2px 0; ",
    "padding: 5px; background-color: #efefef; }",
);

/// The final report: page fragments in completion order, closed on render
#[derive(Debug, Clone, Default)]
pub struct ReportDocument {
    fragments: Vec<PageFragment>,
}

impl ReportDocument {
    pub fn new(fragments: Vec<PageFragment>) -> Self {
        Self { fragments }
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Renders the complete HTML document
    pub fn render(&self) -> String {
        let body_len: usize = self.fragments.iter().map(|f| f.as_str().len()).sum();
        let mut html = String::with_capacity(body_len + STYLE.len() + 256);

        html.push_str(r#"<html lang="en_US"><head>"#);
        html.push_str(&format!("<title>{}</title>", REPORT_TITLE));
        html.push_str(&format!("<style>{}</style>", STYLE));
        html.push_str("</head><body>");
        html.push_str(&format!("<h1>{}</h1>", REPORT_HEADING));

        for fragment in &self.fragments {
            html.push_str(fragment.as_str());
        }

        html.push_str("</body></html>");
        html
    }

    /// Writes the document to `path` in one step
    ///
    /// The content goes to a sibling temporary file first and is renamed
    /// into place, so an interrupted write never leaves a truncated report.
    pub async fn write_to(&self, path: &Path) -> OutputResult<()> {
        let html = self.render();
        let write_err = |source| OutputError::Write {
            path: path.display().to_string(),
            source,
        };

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        tokio::fs::write(&tmp_path, html).await.map_err(write_err)?;
        tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

        tracing::info!("Report written to {}", path.display());
        Ok(())
    }
}
