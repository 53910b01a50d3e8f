use clap::Parser;

/// Reported (as a JSON error object) when the URL argument is missing.
pub const USAGE: &str = "Usage: pharos <url>";

#[derive(Parser)]
#[command(
    name = "pharos",
    version,
    about = "Lighthouse audit runner — normalized page scores as JSON"
)]
pub struct Cli {
    /// Target URL to audit
    pub url: Option<String>,
}
