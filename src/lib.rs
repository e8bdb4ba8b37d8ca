//! Collision-checked code allocation for school-management records.
//!
//! [`code::CodeGenerator`] turns a [`code::GenerationRequest`] into a code
//! that is free in the requested scope; [`code::create_entity`] also stores
//! it. Every external boundary is a port in [`ports`], bundled in a
//! [`context::ServiceContext`].

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod code;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;

use clap::error::ErrorKind;
use clap::Parser;

/// Environment variable holding the log filter (default `warn`).
pub const LOG_ENV: &str = "SCHOOLCODE_LOG";

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_kinds() {
        assert!(run(["schoolcode", "kinds"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        assert!(run(["schoolcode", "unknown"]).is_err());
    }

    #[test]
    fn run_errors_on_invalid_code() {
        let err = run(["schoolcode", "validate", "employee", "EMP12"]).unwrap_err();
        assert!(err.contains("employee codes are 9 characters long"));
    }
}
