//! `schoolcode list` command.

use std::fmt::Write;

use crate::code::EntityKind;
use crate::context::ServiceContext;
use crate::ports::RecordFilter;

/// Prints stored records, oldest first, one tab-separated line each:
/// code, kind, tenant (`-` when global), created, status, label.
///
/// # Errors
///
/// Returns the store error message.
pub fn run(
    ctx: &ServiceContext,
    kind: Option<EntityKind>,
    tenant: Option<&str>,
) -> Result<String, String> {
    let filter = RecordFilter { kind, tenant: tenant.map(String::from) };
    let records = ctx.registry.list(&filter).map_err(|e| e.to_string())?;

    let mut out = String::new();
    for record in records {
        let status = if record.is_active() { "active" } else { "retired" };
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{status}\t{}",
            record.code,
            record.kind,
            record.tenant.as_deref().unwrap_or("-"),
            record.created_at.format("%Y-%m-%dT%H:%M:%SZ"),
            record.label.as_deref().unwrap_or(""),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{create_entity, retire_entity, CodeGenerator, GenerationRequest, Scope};

    #[test]
    fn shows_status_and_owner() {
        let ctx = ServiceContext::in_memory();
        let generator = CodeGenerator::new(&ctx);
        let request = GenerationRequest::new(EntityKind::Subject)
            .attribute("name", "Physics")
            .scope(Scope::tenant("school123"));
        let first = create_entity(&generator, &request, Some("Physics")).unwrap();
        create_entity(&generator, &request, None).unwrap();
        retire_entity(&ctx, EntityKind::Subject, &first.code, &Scope::tenant("school123")).unwrap();

        let out = run(&ctx, None, Some("school123")).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("SUBPHY001\tsubject\tschool123\t"));
        assert!(lines[0].ends_with("\tretired\tPhysics"));
        assert!(lines[1].ends_with("\tactive\t"));
    }

    #[test]
    fn empty_registry_prints_nothing() {
        let ctx = ServiceContext::in_memory();
        assert_eq!(run(&ctx, Some(EntityKind::Bus), None).unwrap(), "");
    }
}
