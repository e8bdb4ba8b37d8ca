//! Generate-then-insert workflow used by record-creation handlers.

use tracing::warn;

use super::{Code, CodeGenerator, EntityKind, GenerationRequest, Scope};
use crate::context::ServiceContext;
use crate::error::{CreateError, InsertError, StoreError};
use crate::ports::{EntityRecord, NewEntity};

/// Generate-and-insert cycles before a duplicate key is surfaced.
const INSERT_ROUNDS: usize = 2;

/// Allocates a code for `request` and inserts the record.
///
/// A duplicate key at insert time means a concurrent caller took the code
/// after the existence check. That triggers exactly one more full
/// generate-then-insert cycle.
///
/// # Errors
///
/// - [`CreateError::Generate`] if generation fails (nothing is inserted).
/// - [`CreateError::DuplicateKey`] if the retry collides again.
/// - [`CreateError::Store`] if the insert fails for any other reason.
pub fn create_entity(
    generator: &CodeGenerator<'_>,
    request: &GenerationRequest,
    label: Option<&str>,
) -> Result<EntityRecord, CreateError> {
    let ctx = generator.context();
    let mut round = 1;
    loop {
        let code = generator.generate(request)?;
        let entity = NewEntity {
            kind: request.kind,
            code,
            scope: request.scope.clone(),
            label: label.map(String::from),
            created_at: ctx.clock.now(),
        };
        match ctx.registry.insert(&entity) {
            Ok(record) => return Ok(record),
            Err(InsertError::DuplicateKey { kind, code }) if round < INSERT_ROUNDS => {
                warn!(%kind, %code, round, "code taken between check and insert");
                round += 1;
            }
            Err(InsertError::DuplicateKey { kind, code }) => {
                warn!(%kind, %code, round, "code taken between check and insert, giving up");
                return Err(CreateError::DuplicateKey { kind, code });
            }
            Err(InsertError::Store(err)) => return Err(CreateError::Store(err)),
        }
    }
}

/// Retires the record holding `code`. The code is never issued again.
///
/// Returns `false` if no active record matched.
///
/// # Errors
///
/// Returns a [`StoreError`] if the registry update fails.
pub fn retire_entity(
    ctx: &ServiceContext,
    kind: EntityKind,
    code: &Code,
    scope: &Scope,
) -> Result<bool, StoreError> {
    ctx.registry.retire(kind, code, scope, ctx.clock.now())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::adapters::memory::MemoryRegistry;
    use crate::error::GenerateError;
    use crate::ports::{CodeRegistry, RecordFilter};

    /// Registry whose first `n` inserts lose a race to another writer.
    struct RacingRegistry {
        inner: MemoryRegistry,
        races_left: AtomicUsize,
        inserts: AtomicUsize,
    }

    impl RacingRegistry {
        fn losing(n: usize) -> Self {
            Self {
                inner: MemoryRegistry::new(),
                races_left: AtomicUsize::new(n),
                inserts: AtomicUsize::new(0),
            }
        }
    }

    impl CodeRegistry for RacingRegistry {
        fn exists(&self, kind: EntityKind, code: &Code, scope: &Scope) -> Result<bool, StoreError> {
            self.inner.exists(kind, code, scope)
        }

        fn insert(&self, entity: &NewEntity) -> Result<EntityRecord, InsertError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            let lost = self
                .races_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if lost {
                // Another writer got there first.
                self.inner.insert(entity)?;
                return Err(InsertError::DuplicateKey {
                    kind: entity.kind,
                    code: entity.code.to_string(),
                });
            }
            self.inner.insert(entity)
        }

        fn retire(
            &self,
            kind: EntityKind,
            code: &Code,
            scope: &Scope,
            at: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            self.inner.retire(kind, code, scope, at)
        }

        fn list(&self, filter: &RecordFilter) -> Result<Vec<EntityRecord>, StoreError> {
            self.inner.list(filter)
        }
    }

    fn context(registry: Arc<dyn CodeRegistry>) -> ServiceContext {
        let mut ctx = ServiceContext::in_memory();
        ctx.registry = Box::new(registry);
        ctx
    }

    fn class_request() -> GenerationRequest {
        GenerationRequest::new(EntityKind::Class)
            .attribute("batchCode", "BATCH24")
            .attribute("level", "10")
            .attribute("section", "A")
            .scope(Scope::tenant("school123"))
    }

    #[test]
    fn create_inserts_generated_code() {
        let ctx = ServiceContext::in_memory();
        let generator = CodeGenerator::new(&ctx);

        let record = create_entity(&generator, &class_request(), Some("Grade 10 A")).unwrap();

        assert_eq!(record.code.as_str(), "CLS10A24001");
        assert_eq!(record.tenant.as_deref(), Some("school123"));
        assert_eq!(record.label.as_deref(), Some("Grade 10 A"));
        assert!(ctx.registry.exists(EntityKind::Class, &record.code, &record_scope()).unwrap());
    }

    fn record_scope() -> Scope {
        Scope::tenant("school123")
    }

    #[test]
    fn second_create_in_same_tenant_gets_next_counter() {
        let ctx = ServiceContext::in_memory();
        let generator = CodeGenerator::new(&ctx);

        let first = create_entity(&generator, &class_request(), None).unwrap();
        let second = create_entity(&generator, &class_request(), None).unwrap();

        assert_ne!(first.code, second.code);
        assert_eq!(second.code.as_str(), "CLS10A24002");
    }

    #[test]
    fn one_lost_race_is_retried() {
        let registry = Arc::new(RacingRegistry::losing(1));
        let ctx = context(registry.clone());
        let generator = CodeGenerator::new(&ctx);

        let record = create_entity(&generator, &class_request(), None).unwrap();

        assert_eq!(record.code.as_str(), "CLS10A24002");
        assert_eq!(registry.inserts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn two_lost_races_surface_duplicate_key() {
        let registry = Arc::new(RacingRegistry::losing(2));
        let ctx = context(registry.clone());
        let generator = CodeGenerator::new(&ctx);

        let err = create_entity(&generator, &class_request(), None).unwrap_err();

        match err {
            CreateError::DuplicateKey { kind, code } => {
                assert_eq!(kind, EntityKind::Class);
                assert_eq!(code, "CLS10A24002");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.inserts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn surfaced_duplicate_names_the_last_rejected_code() {
        let registry = Arc::new(RacingRegistry::losing(3));
        let ctx = context(registry.clone());
        let generator = CodeGenerator::new(&ctx);

        let err = create_entity(&generator, &class_request(), None).unwrap_err();

        assert!(matches!(err, CreateError::DuplicateKey { ref code, .. } if !code.is_empty()));
        assert_eq!(registry.inserts.load(Ordering::SeqCst), INSERT_ROUNDS);
        assert_eq!(registry.races_left.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blank_tenant_creates_nothing() {
        let ctx = ServiceContext::in_memory();
        let generator = CodeGenerator::new(&ctx);
        let request = class_request().scope(Scope::tenant(""));

        let err = create_entity(&generator, &request, None).unwrap_err();

        assert!(matches!(err, CreateError::Generate(GenerateError::InvalidAttributes { .. })));
        assert!(ctx.registry.list(&RecordFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn invalid_attributes_insert_nothing() {
        let ctx = ServiceContext::in_memory();
        let generator = CodeGenerator::new(&ctx);
        let request = GenerationRequest::new(EntityKind::Bus).scope(Scope::tenant("school123"));

        let err = create_entity(&generator, &request, None).unwrap_err();

        assert!(matches!(err, CreateError::Generate(GenerateError::InvalidAttributes { .. })));
        assert!(ctx.registry.list(&RecordFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn retired_codes_are_never_reissued() {
        let ctx = ServiceContext::in_memory();
        let generator = CodeGenerator::new(&ctx);
        let first = create_entity(&generator, &class_request(), None).unwrap();

        assert!(retire_entity(&ctx, EntityKind::Class, &first.code, &record_scope()).unwrap());
        let next = create_entity(&generator, &class_request(), None).unwrap();

        assert_ne!(next.code, first.code);
        assert!(!retire_entity(&ctx, EntityKind::Class, &first.code, &record_scope()).unwrap());
    }
}
