//! Audit runner: one external audit-tool process per page

use crate::audit::model::AuditOutcome;
use crate::audit::report::parse_report;
use crate::audit::AuditError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use url::Url;

/// Flags passed to every audit-tool invocation, after the target URL
///
/// They request a single JSON document on stdout, headless Chrome, and no
/// device/CPU/network emulation so results do not vary between runs.
pub const FIXED_FLAGS: &[&str] = &[
    "--output=json",
    "--output-path=stdout",
    "--disable-device-emulation",
    "--disable-cpu-throttling",
    "--disable-network-throttling",
    "--chrome-flags=--headless --disable-gpu",
];

/// Something that can audit a single page
///
/// The dispatch loop only talks to this trait, so tests can substitute a
/// runner that never spawns a process.
#[async_trait]
pub trait AuditRunner: Send + Sync {
    /// Audits `url`, returning its normalized outcome or a page-level failure
    async fn audit(&self, url: &Url) -> Result<AuditOutcome, AuditError>;
}

/// The program used to launch the audit tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCommand {
    /// Executable to spawn
    pub program: PathBuf,

    /// Arguments placed before the target URL (e.g. `lighthouse` when the
    /// program is `npx`)
    pub leading_args: Vec<String>,
}

impl AuditCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_leading_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.leading_args.extend(args);
        self
    }
}

impl Default for AuditCommand {
    fn default() -> Self {
        Self::new("lighthouse")
    }
}

/// Runs Lighthouse as a subprocess and parses its JSON report
#[derive(Debug, Clone)]
pub struct LighthouseRunner {
    command: AuditCommand,
    config_path: PathBuf,
}

impl LighthouseRunner {
    /// Creates a runner that passes `config_path` to every invocation
    ///
    /// The path should be absolute; the tool's working directory is not
    /// guaranteed to match ours.
    pub fn new(command: AuditCommand, config_path: impl Into<PathBuf>) -> Self {
        Self {
            command,
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Full argument list for auditing `url`
    pub fn build_args(&self, url: &Url) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .command
            .leading_args
            .iter()
            .map(OsString::from)
            .collect();

        args.push(url.as_str().into());
        args.extend(FIXED_FLAGS.iter().map(OsString::from));

        let mut config_flag = OsString::from("--config-path=");
        config_flag.push(self.config_path.as_os_str());
        args.push(config_flag);

        args
    }
}

#[async_trait]
impl AuditRunner for LighthouseRunner {
    async fn audit(&self, url: &Url) -> Result<AuditOutcome, AuditError> {
        tracing::debug!("Spawning {} for {}", self.command.program.display(), url);

        // kill_on_drop reaps the child on every exit path, including a
        // cancelled future
        let output = Command::new(&self.command.program)
            .args(self.build_args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AuditError::Spawn {
                program: self.command.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            tracing::warn!(
                "Audit tool exited with {} for {}: {}",
                output.status,
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_report(url, &stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.test/page").unwrap()
    }

    #[test]
    fn test_build_args_order() {
        let runner = LighthouseRunner::new(AuditCommand::default(), "/etc/lh/config.json");
        let args = runner.build_args(&url());

        assert_eq!(args[0], "https://example.test/page");
        assert_eq!(args[1], "--output=json");
        assert_eq!(args[2], "--output-path=stdout");
        assert!(args.contains(&OsString::from("--disable-device-emulation")));
        assert!(args.contains(&OsString::from("--disable-cpu-throttling")));
        assert!(args.contains(&OsString::from("--disable-network-throttling")));
        assert!(args.contains(&OsString::from("--chrome-flags=--headless --disable-gpu")));
        assert_eq!(
            args.last().unwrap(),
            &OsString::from("--config-path=/etc/lh/config.json")
        );
    }

    #[test]
    fn test_leading_args_come_before_url() {
        let command =
            AuditCommand::new("npx").with_leading_args(vec!["lighthouse".to_string()]);
        let runner = LighthouseRunner::new(command, "/tmp/c.json");
        let args = runner.build_args(&url());

        assert_eq!(args[0], "lighthouse");
        assert_eq!(args[1], "https://example.test/page");
        assert_eq!(args.len(), 2 + FIXED_FLAGS.len() + 1);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = LighthouseRunner::new(
            AuditCommand::new("/nonexistent/lumen-sweep-audit-tool"),
            "/tmp/c.json",
        );
        let err = runner.audit(&url()).await.unwrap_err();
        assert!(matches!(err, AuditError::Spawn { .. }));
        assert!(err.raw_output().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_json_output_is_parse_error() {
        let command = AuditCommand::new("sh").with_leading_args(vec![
            "-c".to_string(),
            "echo not-json".to_string(),
            "lighthouse".to_string(),
        ]);
        let runner = LighthouseRunner::new(command, "/tmp/c.json");

        let err = runner.audit(&url()).await.unwrap_err();
        assert_eq!(err.raw_output().map(str::trim), Some("not-json"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_json_output_is_normalized() {
        let report = r#"{"reportCategories":[{"name":"SEO","audits":[{"id":"meta-description","score":0,"result":{"description":"Has a meta description"}}]}]}"#;
        let command = AuditCommand::new("sh").with_leading_args(vec![
            "-c".to_string(),
            format!("printf '%s' '{}'", report),
            "lighthouse".to_string(),
        ]);
        let runner = LighthouseRunner::new(command, "/tmp/c.json");

        let outcome = runner.audit(&url()).await.unwrap();
        assert_eq!(outcome.categories[0].name, "SEO");
        assert_eq!(outcome.violation_count(), 1);
    }
}
