//! Live clock using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Live clock that returns the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{EntityKind, GenerationRequest};
    use crate::context::ServiceContext;

    #[test]
    fn returns_current_time() {
        let clock = LiveClock;
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(now >= before);
        assert!(now <= after);
    }

    #[test]
    fn fee_codes_carry_the_current_month() {
        let ctx = ServiceContext::in_memory();
        let expected = format!("FEE{}", Utc::now().format("%Y%m"));
        let code = crate::code::CodeGenerator::new(&ctx)
            .generate(&GenerationRequest::new(EntityKind::Fee))
            .unwrap();
        assert!(code.as_str().starts_with(&expected), "{code} should start with {expected}");
    }
}
