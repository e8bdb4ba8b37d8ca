//! `schoolcode validate` command.

use crate::code::{Code, EntityKind};

/// Checks `code` against the format of `kind`. The registry is not consulted.
///
/// # Errors
///
/// Returns the format violation, prefixed with the code.
pub fn run(kind: EntityKind, code: &str) -> Result<String, String> {
    let code = Code::parse(kind, code).map_err(|e| format!("{code}: {e}"))?;
    Ok(format!("{code}: valid {kind} code\n"))
}
