//! `schoolcode generate` command.

use crate::code::{CodeGenerator, GenerationRequest};
use crate::context::ServiceContext;

/// Prints a code that is free right now. Nothing is stored, so a later
/// `create` may still pick a different one.
///
/// # Errors
///
/// Returns the generation error message.
pub fn run(
    ctx: &ServiceContext,
    max_attempts: u32,
    request: &GenerationRequest,
) -> Result<String, String> {
    let code = CodeGenerator::new(ctx)
        .with_max_attempts(max_attempts)
        .generate(request)
        .map_err(|e| e.to_string())?;
    Ok(format!("{code}\n"))
}
