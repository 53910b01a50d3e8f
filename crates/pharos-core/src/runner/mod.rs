//! Subprocess orchestration for a single audit pass.
//!
//! Measurement is delegated entirely to the Lighthouse CLI; this module
//! owns the process lifecycle around it:
//! - a unique scratch directory for the report, removed on every exit path
//! - a hard wall-clock timeout with kill-and-reap
//! - stderr capture for diagnostics
//! - report pickup and normalization

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::errors::{truncate_stderr, AuditError};
use crate::launcher::{NpxLauncher, ToolLauncher};
use crate::report::{normalize, AuditOutcome, AuditReport, CATEGORY_IDS};

/// Logical name of the external auditor, resolved via [`ToolLauncher`].
pub const AUDITOR_TOOL: &str = "lighthouse";

/// Hard wall-clock limit for one audit subprocess.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

const REPORT_FILE: &str = "report.json";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs one audit per call. Stateless between calls; concurrent
/// invocations are independent (each gets its own subprocess and
/// scratch directory).
pub struct AuditRunner {
    timeout: Duration,
    launcher: Box<dyn ToolLauncher + Send + Sync>,
}

impl Default for AuditRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            launcher: Box::new(NpxLauncher),
        }
    }
}

impl AuditRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_launcher(mut self, launcher: impl ToolLauncher + Send + Sync + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    /// Audit `url` and return the normalized outcome.
    ///
    /// Every failure is folded into the error shape; nothing panics and
    /// no error type crosses this boundary.
    pub fn run(&self, url: &str) -> AuditOutcome {
        self.run_checked(url).into()
    }

    fn run_checked(&self, url: &str) -> Result<AuditReport, AuditError> {
        let scratch = tempfile::Builder::new().prefix("pharos-").tempdir()?;
        let report_path = scratch.path().join(REPORT_FILE);

        let result = self.audit_once(url, &report_path);

        if let Err(e) = scratch.close() {
            tracing::warn!(error = %e, "failed to remove audit scratch dir");
        }
        result
    }

    fn audit_once(&self, url: &str, report_path: &Path) -> Result<AuditReport, AuditError> {
        let mut child = self.spawn_auditor(url, report_path)?;

        let status = match wait_timeout(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                // Timed out — kill the child and reap it before returning
                let _ = child.kill();
                let _ = child.wait();
                return Err(AuditError::Timeout);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AuditError::Io(e));
            }
        };

        let stderr = read_stderr(&mut child);
        tracing::debug!(exit_code = ?status.code(), "auditor exited");

        if !report_path.exists() {
            return Err(AuditError::ReportMissing { stderr });
        }

        let raw = std::fs::read_to_string(report_path)?;
        let report: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| AuditError::ReportInvalid {
                detail: e.to_string(),
                stderr,
            })?;

        Ok(normalize(url, &report))
    }

    fn spawn_auditor(&self, url: &str, report_path: &Path) -> Result<Child, AuditError> {
        let resolved = self.launcher.resolve(AUDITOR_TOOL);
        tracing::debug!(program = %resolved.program.display(), url, "spawning auditor");

        Command::new(&resolved.program)
            .args(&resolved.leading_args)
            .args(audit_args(url, report_path))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AuditError::ToolNotFound
                } else {
                    AuditError::Io(e)
                }
            })
    }
}

/// The fixed Lighthouse argument set for one audit pass.
fn audit_args(url: &str, report_path: &Path) -> Vec<String> {
    vec![
        url.to_string(),
        "--output=json".into(),
        format!("--output-path={}", report_path.display()),
        "--chrome-flags=--headless".into(),
        format!("--only-categories={}", CATEGORY_IDS.join(",")),
        "--no-enable-error-reporting".into(),
        "--quiet".into(),
    ]
}

/// Wait for `child` to exit, polling up to `timeout`. `Ok(None)` means
/// the deadline passed with the child still running.
fn wait_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(Some(status)),
            None => {
                if start.elapsed() >= timeout {
                    return Ok(None);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

fn read_stderr(child: &mut Child) -> String {
    let mut buf = String::new();
    if let Some(ref mut stderr) = child.stderr {
        let _ = stderr.read_to_string(&mut buf);
    }
    truncate_stderr(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_set_is_fixed() {
        let args = audit_args("https://example.com", Path::new("/tmp/report.json"));
        assert_eq!(
            args,
            vec![
                "https://example.com".to_string(),
                "--output=json".to_string(),
                "--output-path=/tmp/report.json".to_string(),
                "--chrome-flags=--headless".to_string(),
                "--only-categories=performance,accessibility,best-practices,seo".to_string(),
                "--no-enable-error-reporting".to_string(),
                "--quiet".to_string(),
            ]
        );
    }
}
