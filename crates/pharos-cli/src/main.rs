use clap::Parser;

mod args;
pub mod exit_codes;

use args::{Cli, USAGE};
use pharos_core::AuditRunner;

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::INTERNAL_ERROR
        }
    };
    std::process::exit(code);
}

/// One JSON document on stdout per invocation. Audit failures are part
/// of that document; only a missing URL argument changes the exit code.
fn run(cli: Cli) -> anyhow::Result<i32> {
    let Some(url) = cli.url else {
        let usage = serde_json::json!({ "error": USAGE });
        println!("{}", serde_json::to_string_pretty(&usage)?);
        return Ok(exit_codes::USAGE_ERROR);
    };

    let outcome = AuditRunner::new().run(&url);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(exit_codes::SUCCESS)
}
