//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::code::EntityKind;

/// Top-level CLI parser for `schoolcode`.
#[derive(Debug, Parser)]
#[command(
    name = "schoolcode",
    version,
    about = "Allocate collision-checked codes for school records"
)]
pub struct Cli {
    /// SQLite registry file (overrides config and `SCHOOLCODE_DB`).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// YAML config file (default: ./schoolcode.yaml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Serve clock, entropy, and registry from a recorded cassette.
    #[arg(long, global = true, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every kind with its code shape and required attributes.
    Kinds,
    /// Print a free code without storing it.
    Generate {
        /// Kind of record.
        kind: EntityKind,
        /// Template inputs.
        #[command(flatten)]
        input: RequestArgs,
        /// Draw random tails from this seed.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Allocate a code and store the record.
    Create {
        /// Kind of record.
        kind: EntityKind,
        /// Template inputs.
        #[command(flatten)]
        input: RequestArgs,
        /// Free-form label stored with the record.
        #[arg(long)]
        label: Option<String>,
    },
    /// Check a code against its kind's format.
    Validate {
        /// Kind to check against.
        kind: EntityKind,
        /// Candidate code.
        code: String,
    },
    /// Print stored records.
    List {
        /// Only this kind.
        #[arg(long)]
        kind: Option<EntityKind>,
        /// Only this school's records.
        #[arg(long)]
        tenant: Option<String>,
    },
    /// Retire a record. Its code is never issued again.
    Retire {
        /// Kind of record.
        kind: EntityKind,
        /// Code of the record.
        code: String,
        /// Owning school, for tenant-scoped kinds.
        #[arg(long)]
        tenant: Option<String>,
    },
}

/// Attributes and scope shared by `generate` and `create`.
#[derive(Debug, Clone, Default, Args)]
pub struct RequestArgs {
    /// Template attribute as `name=value` (repeatable).
    #[arg(short = 'a', long = "attr", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,
    /// Owning school, required for tenant-scoped kinds.
    #[arg(long)]
    pub tenant: Option<String>,
}

/// Parses `name=value`. The value may itself contain `=`.
///
/// # Errors
///
/// Returns a message if there is no `=` or the name is empty.
pub fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("attribute name is empty in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}
