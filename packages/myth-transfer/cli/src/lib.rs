//! Shared plumbing for the myth-transfer example programs

pub mod accounts;
pub mod args;
pub mod logging;
pub mod report;

use std::process::ExitCode;

/// Log a fatal error chain and turn the outcome into a process exit code
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
