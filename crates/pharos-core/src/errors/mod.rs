use thiserror::Error;

/// Maximum number of stderr bytes carried into an error result.
pub const STDERR_LIMIT: usize = 500;

/// Failure modes of a single audit pass. Every variant is folded into
/// the JSON error shape at the `AuditRunner::run` boundary; none of
/// them propagate past it.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Lighthouse audit timed out")]
    Timeout,

    #[error("Lighthouse CLI not found. Install with: npm install -g lighthouse")]
    ToolNotFound,

    #[error("Lighthouse failed to generate report")]
    ReportMissing { stderr: String },

    #[error("Lighthouse produced an unreadable report: {detail}")]
    ReportInvalid { detail: String, stderr: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Subprocess diagnostics attached to this error, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            AuditError::ReportMissing { stderr } | AuditError::ReportInvalid { stderr, .. } => {
                (!stderr.is_empty()).then_some(stderr.as_str())
            }
            _ => None,
        }
    }
}

/// Cap captured stderr at [`STDERR_LIMIT`] bytes without splitting a
/// UTF-8 character.
pub fn truncate_stderr(raw: &str) -> String {
    if raw.len() <= STDERR_LIMIT {
        return raw.to_string();
    }
    let mut end = STDERR_LIMIT;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    raw[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_stderr_passes_through() {
        assert_eq!(truncate_stderr("boom"), "boom");
        assert_eq!(truncate_stderr(""), "");
    }

    #[test]
    fn long_stderr_is_capped() {
        let raw = "x".repeat(2000);
        let capped = truncate_stderr(&raw);
        assert_eq!(capped.len(), STDERR_LIMIT);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; 300 of them straddle the 500-byte limit.
        let raw = "é".repeat(300);
        let capped = truncate_stderr(&raw);
        assert!(capped.len() <= STDERR_LIMIT);
        assert!(capped.chars().all(|c| c == 'é'));
    }

    #[test]
    fn messages_match_the_output_contract() {
        assert_eq!(AuditError::Timeout.to_string(), "Lighthouse audit timed out");
        assert_eq!(
            AuditError::ToolNotFound.to_string(),
            "Lighthouse CLI not found. Install with: npm install -g lighthouse"
        );
        assert_eq!(
            AuditError::ReportMissing { stderr: String::new() }.to_string(),
            "Lighthouse failed to generate report"
        );
    }

    #[test]
    fn stderr_accessor_skips_empty_capture() {
        let err = AuditError::ReportMissing { stderr: String::new() };
        assert_eq!(err.stderr(), None);

        let err = AuditError::ReportMissing { stderr: "oops".into() };
        assert_eq!(err.stderr(), Some("oops"));

        assert_eq!(AuditError::Timeout.stderr(), None);
    }
}
