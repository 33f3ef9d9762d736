//! Full sweeps: discovery, audit subprocesses, report and verdict

use lumen_sweep::audit::AuditCommand;
use lumen_sweep::config::load_config;
use lumen_sweep::dispatch::{run_sweep, SweepOptions};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAILING_REPORT: &str = r#"{
  "reportCategories": [
    {
      "name": "Accessibility",
      "audits": [
        { "id": "document-title", "score": 100, "result": { "description": "Document has a title" } },
        {
          "id": "image-alt",
          "score": 40,
          "result": {
            "description": "Image elements have [alt] attributes",
            "extendedInfo": { "value": { "nodes": [
              { "failureSummary": "Fix any of the following: missing alt text", "html": "<img src=\"a.png\">" },
              { "failureSummary": "Fix any of the following: missing alt text", "html": "<img src=\"b.png\">" }
            ] } }
          }
        }
      ]
    }
  ]
}"#;

const CLEAN_REPORT: &str = r#"{
  "reportCategories": [
    {
      "name": "Accessibility",
      "audits": [
        { "id": "document-title", "score": 100, "result": { "description": "Document has a title" } },
        { "id": "image-alt", "score": 100, "result": { "description": "Image elements have [alt] attributes" } }
      ]
    }
  ]
}"#;

struct Fixture {
    dir: TempDir,
    config_path: PathBuf,
    output_path: PathBuf,
}

impl Fixture {
    fn new(max_depth: u32, max_chrome_instances: usize) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            format!(
                r#"{{ "extends": "lighthouse:default", "settings": {{ "crawler": {{ "maxDepth": {}, "maxChromeInstances": {} }} }} }}"#,
                max_depth, max_chrome_instances
            ),
        )
        .expect("write config");
        std::fs::write(dir.path().join("failing.json"), FAILING_REPORT).expect("write report");
        std::fs::write(dir.path().join("clean.json"), CLEAN_REPORT).expect("write report");

        let output_path = dir.path().join("result.html");
        Self {
            dir,
            config_path,
            output_path,
        }
    }

    fn fixture(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    /// An audit "tool" that answers by URL path: `/about` is clean,
    /// `/broken` prints garbage, everything else fails
    fn audit_command(&self) -> AuditCommand {
        let script = format!(
            r#"case "$1" in
  */about) cat '{clean}' ;;
  */broken) echo not-json ;;
  *) cat '{failing}' ;;
esac"#,
            clean = self.fixture("clean.json"),
            failing = self.fixture("failing.json"),
        );

        AuditCommand::new("sh").with_leading_args(vec![
            "-c".to_string(),
            script,
            "lighthouse".to_string(),
        ])
    }

    fn options(&self, seed: &str) -> SweepOptions {
        SweepOptions {
            seed: Url::parse(seed).expect("seed"),
            config_path: self.config_path.clone(),
            output_path: self.output_path.clone(),
            audit_command: self.audit_command(),
        }
    }

    fn report(&self) -> String {
        read(&self.output_path)
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("report written")
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"),
        )
        .mount(server)
        .await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_grouped_failure_across_two_pages() {
    let server = MockServer::start().await;
    mount_html(&server, "/", r#"<html><body><a href="/about">About</a></body></html>"#).await;
    mount_html(&server, "/about", "<html><body>About us</body></html>").await;

    let fixture = Fixture::new(2, 2);
    let config = load_config(&fixture.config_path).expect("config");

    let verdict = run_sweep(&config, fixture.options(&format!("{}/", server.uri())))
        .await
        .expect("sweep");

    assert_eq!(verdict.pages_scanned, 2);
    assert_eq!(verdict.total_violations, 2);
    assert_eq!(verdict.exit_code(), 1);

    let html = fixture.report();
    assert_eq!(html.matches("<title>").count(), 1);
    assert_eq!(html.matches(r#"<h2 class="audit-url">"#).count(), 2);
    assert_eq!(html.matches("<strong>missing alt text.</strong>").count(), 1);
    assert!(html.contains("<li>&lt;img src=\"a.png\"&gt;</li>"));
    assert!(html.contains("<li>&lt;img src=\"b.png\"&gt;</li>"));
    assert!(!html.contains("<img src="));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unparseable_output_counts_once_and_run_continues() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/broken">Broken</a><a href="/about">About</a></body></html>"#,
    )
    .await;
    mount_html(&server, "/broken", "<html><body>Broken</body></html>").await;
    mount_html(&server, "/about", "<html><body>About</body></html>").await;

    let fixture = Fixture::new(2, 1);
    let config = load_config(&fixture.config_path).expect("config");

    let verdict = run_sweep(&config, fixture.options(&format!("{}/", server.uri())))
        .await
        .expect("sweep");

    // 2 offending nodes on "/", 1 for the unparseable "/broken", 0 for "/about"
    assert_eq!(verdict.pages_scanned, 3);
    assert_eq!(verdict.total_violations, 3);
    assert_eq!(verdict.exit_code(), 1);

    let html = fixture.report();
    assert!(html.contains("/broken"));
    assert!(html.contains("audit-error"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_clean_site_exits_zero() {
    let server = MockServer::start().await;
    mount_html(&server, "/about", "<html><body>About</body></html>").await;

    let fixture = Fixture::new(1, 1);
    let config = load_config(&fixture.config_path).expect("config");

    let verdict = run_sweep(&config, fixture.options(&format!("{}/about", server.uri())))
        .await
        .expect("sweep");

    assert_eq!(verdict.pages_scanned, 1);
    assert!(verdict.is_clean());
    assert_eq!(verdict.exit_code(), 0);
    assert!(fixture.report().ends_with("</body></html>"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreachable_pages_are_silently_skipped() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/about",
        r#"<html><body><a href="/gone">Gone</a></body></html>"#,
    )
    .await;

    let fixture = Fixture::new(2, 1);
    let config = load_config(&fixture.config_path).expect("config");

    let verdict = run_sweep(&config, fixture.options(&format!("{}/about", server.uri())))
        .await
        .expect("sweep");

    assert_eq!(verdict.pages_scanned, 1);
    assert_eq!(verdict.exit_code(), 0);
    assert!(!fixture.report().contains("/gone"));
}
