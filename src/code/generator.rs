//! Collision-checked code generation.
//!
//! [`CodeGenerator::generate`] renders a kind's stem once, then tries tails
//! until the registry reports a candidate as free. The loop is local to the
//! call: no counter or cache survives between calls, and the store's own
//! uniqueness enforcement at insert time remains the final backstop.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::{Code, GenerationRequest};
use crate::adapters::live::entropy::SeededEntropy;
use crate::context::ServiceContext;
use crate::error::GenerateError;
use crate::ports::Entropy;

/// Ceiling on registry checks per call when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Redraws allowed when a random tail repeats a candidate already rejected in this call.
const MAX_REDRAWS: usize = 16;

/// Allocates codes that were free in the registry at the time of the check.
pub struct CodeGenerator<'a> {
    ctx: &'a ServiceContext,
    max_attempts: u32,
}

impl<'a> CodeGenerator<'a> {
    /// Creates a generator with the default ceiling.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx, max_attempts: DEFAULT_MAX_ATTEMPTS }
    }

    /// Overrides the number of registry checks before giving up. Zero is treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The configured ceiling.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The context this generator reads from.
    #[must_use]
    pub const fn context(&self) -> &'a ServiceContext {
        self.ctx
    }

    /// Generates a code for `request` that the registry reported as free.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::InvalidAttributes`] before any registry access when
    ///   the template cannot be rendered from the attributes or the tenant id
    ///   is blank.
    /// - [`GenerateError::GenerationExhausted`] after `max_attempts` taken
    ///   candidates, or earlier once a counter tail runs out of values.
    /// - [`GenerateError::StoreUnavailable`] as soon as an existence check fails.
    pub fn generate(&self, request: &GenerationRequest) -> Result<Code, GenerateError> {
        let kind = request.kind;
        let template = kind.template();
        request
            .scope
            .check()
            .map_err(|reason| GenerateError::InvalidAttributes { kind, reason })?;

        let now = template.needs_clock().then(|| self.ctx.clock.now());
        let stem = template
            .stem(&request.attributes, now)
            .map_err(|reason| GenerateError::InvalidAttributes { kind, reason })?;

        let seeded = request.seed.map(SeededEntropy::new);
        let entropy: &dyn Entropy = match &seeded {
            Some(seeded) => seeded,
            None => self.ctx.entropy.as_ref(),
        };

        let mut rejected: HashSet<String> = HashSet::new();
        let mut checks = 0;
        for attempt in 1..=self.max_attempts {
            let Some(tail) = fresh_tail(template, attempt, entropy, &stem, &rejected) else {
                break;
            };
            let candidate = format!("{stem}{tail}");
            checks += 1;

            let code = Code::from_trusted(candidate);
            if self.ctx.registry.exists(kind, &code, &request.scope)? {
                debug!(%kind, code = %code, attempt, scope = %request.scope, "code taken, retrying");
                rejected.insert(code.as_str().to_string());
                continue;
            }

            debug_assert!(template.validate(code.as_str()).is_ok());
            info!(%kind, code = %code, attempts = checks, scope = %request.scope, "allocated code");
            return Ok(code);
        }

        warn!(%kind, attempts = checks, scope = %request.scope, "code generation exhausted");
        Err(GenerateError::GenerationExhausted { kind, attempts: checks })
    }
}

/// Renders a tail whose candidate has not been rejected earlier in this call.
fn fresh_tail(
    template: &super::Template,
    attempt: u32,
    entropy: &dyn Entropy,
    stem: &str,
    rejected: &HashSet<String>,
) -> Option<String> {
    let mut tail = template.tail(attempt, entropy)?;
    for _ in 0..MAX_REDRAWS {
        if !rejected.contains(&format!("{stem}{tail}")) {
            break;
        }
        tail = template.tail(attempt, entropy)?;
    }
    Some(tail)
}
