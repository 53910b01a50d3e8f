//! Locating the external auditor across platforms.
//!
//! Node package runners ship under different binary names per OS
//! (`npx` vs `npx.cmd`), and CI environments often want to pin an
//! exact binary instead of going through a package runner at all.
//! Both concerns live behind the [`ToolLauncher`] seam so the runner
//! itself stays platform-free.

use std::path::PathBuf;

/// Environment override naming a Lighthouse binary to invoke directly,
/// bypassing the package runner.
pub const LIGHTHOUSE_BIN_ENV: &str = "PHAROS_LIGHTHOUSE_BIN";

/// A resolved invocation: the program to execute plus any leading
/// arguments that come before the tool's own flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
}

/// Maps a logical tool name to the platform-correct invocation.
pub trait ToolLauncher {
    fn resolve(&self, tool: &str) -> ResolvedCommand;
}

/// Launches tools through the `npx` package runner.
///
/// Resolution order: the [`LIGHTHOUSE_BIN_ENV`] override if set and
/// non-empty, otherwise `npx <tool>` (`npx.cmd` on Windows) found via
/// PATH.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpxLauncher;

impl ToolLauncher for NpxLauncher {
    fn resolve(&self, tool: &str) -> ResolvedCommand {
        if let Ok(bin) = std::env::var(LIGHTHOUSE_BIN_ENV) {
            if !bin.is_empty() {
                return ResolvedCommand {
                    program: PathBuf::from(bin),
                    leading_args: Vec::new(),
                };
            }
        }

        let program = if cfg!(windows) { "npx.cmd" } else { "npx" };
        ResolvedCommand {
            program: PathBuf::from(program),
            leading_args: vec![tool.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn resolves_through_the_package_runner() {
        std::env::remove_var(LIGHTHOUSE_BIN_ENV);
        let resolved = NpxLauncher.resolve("lighthouse");
        let expected = if cfg!(windows) { "npx.cmd" } else { "npx" };
        assert_eq!(resolved.program, PathBuf::from(expected));
        assert_eq!(resolved.leading_args, vec!["lighthouse".to_string()]);
    }

    #[test]
    #[serial]
    fn env_override_names_the_binary_directly() {
        std::env::set_var(LIGHTHOUSE_BIN_ENV, "/opt/lighthouse/bin/lighthouse");
        let resolved = NpxLauncher.resolve("lighthouse");
        std::env::remove_var(LIGHTHOUSE_BIN_ENV);

        assert_eq!(resolved.program, PathBuf::from("/opt/lighthouse/bin/lighthouse"));
        assert!(resolved.leading_args.is_empty());
    }

    #[test]
    #[serial]
    fn empty_override_is_ignored() {
        std::env::set_var(LIGHTHOUSE_BIN_ENV, "");
        let resolved = NpxLauncher.resolve("lighthouse");
        std::env::remove_var(LIGHTHOUSE_BIN_ENV);

        assert_eq!(resolved.leading_args, vec!["lighthouse".to_string()]);
    }
}
