//! `schoolcode create` command.

use crate::code::{create_entity, CodeGenerator, GenerationRequest};
use crate::context::ServiceContext;

/// Allocates a code, stores the record, and prints `code<TAB>id`.
///
/// # Errors
///
/// Returns the allocation or store error message.
pub fn run(
    ctx: &ServiceContext,
    max_attempts: u32,
    request: &GenerationRequest,
    label: Option<&str>,
) -> Result<String, String> {
    let generator = CodeGenerator::new(ctx).with_max_attempts(max_attempts);
    let record = create_entity(&generator, request, label).map_err(|e| e.to_string())?;
    Ok(format!("{}\t{}\n", record.code, record.id))
}
