//! `schoolcode retire` command.

use crate::code::{retire_entity, Code, EntityKind, Scope};
use crate::context::ServiceContext;

/// Retires the record holding `code` in `scope`.
///
/// # Errors
///
/// Returns an error if the code is malformed, no active record holds it,
/// or the store fails.
pub fn run(
    ctx: &ServiceContext,
    kind: EntityKind,
    code: &str,
    scope: &Scope,
) -> Result<String, String> {
    let code = Code::parse(kind, code).map_err(|e| format!("{code}: {e}"))?;
    if retire_entity(ctx, kind, &code, scope).map_err(|e| e.to_string())? {
        Ok(format!("retired {kind} {code}\n"))
    } else {
        Err(format!("no active {kind} record with code {code} ({scope})"))
    }
}
