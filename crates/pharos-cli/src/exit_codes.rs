//! Unified exit codes for the pharos CLI.
//! Audit failures are reported inside the JSON body, not via exit code.

pub const SUCCESS: i32 = 0;
pub const USAGE_ERROR: i32 = 1; // Missing URL argument
pub const INTERNAL_ERROR: i32 = 2; // Could not render the output document
