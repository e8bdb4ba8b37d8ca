//! Identifier model: entity kinds, scopes, codes, and generation requests.
//!
//! Formatting rules live in [`template`], the collision-checked retry loop in
//! [`generator`], and the generate-then-insert workflow in [`allocate`].

pub mod allocate;
pub mod generator;
pub mod template;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

pub use allocate::{create_entity, retire_entity};
pub use generator::CodeGenerator;
pub use template::Template;

/// The kinds of record that receive a generated code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum EntityKind {
    /// A school (tenant) registration.
    School,
    /// A staff member.
    Employee,
    /// An admitted student.
    Student,
    /// A class section within a batch.
    Class,
    /// An academic batch (intake year range).
    Batch,
    /// A taught subject.
    Subject,
    /// A transport bus.
    Bus,
    /// A fee record or receipt.
    Fee,
    /// A homework assignment.
    Assignment,
    /// A transport or campus safety alert.
    SafetyAlert,
}

impl EntityKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 10] = [
        Self::School,
        Self::Employee,
        Self::Student,
        Self::Class,
        Self::Batch,
        Self::Subject,
        Self::Bus,
        Self::Fee,
        Self::Assignment,
        Self::SafetyAlert,
    ];

    /// Stable lowercase name used in storage and cassettes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::School => "school",
            Self::Employee => "employee",
            Self::Student => "student",
            Self::Class => "class",
            Self::Batch => "batch",
            Self::Subject => "subject",
            Self::Bus => "bus",
            Self::Fee => "fee",
            Self::Assignment => "assignment",
            Self::SafetyAlert => "safety_alert",
        }
    }

    /// Whether codes of this kind are unique per school rather than globally.
    #[must_use]
    pub const fn is_tenant_scoped(self) -> bool {
        matches!(self, Self::Class | Self::Batch | Self::Subject | Self::Bus)
    }

    /// The format template for this kind.
    #[must_use]
    pub fn template(self) -> &'static Template {
        template::for_kind(self)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind: {s}"))
    }
}

/// The boundary within which a code must be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Unique across every tenant.
    Global,
    /// Unique within one school.
    Tenant(String),
}

impl Scope {
    /// Convenience constructor for a tenant scope.
    pub fn tenant(id: impl Into<String>) -> Self {
        Self::Tenant(id.into())
    }

    /// Rejects a tenant scope whose id is empty or whitespace.
    ///
    /// # Errors
    ///
    /// Returns a message naming the problem.
    pub fn check(&self) -> Result<(), String> {
        match self {
            Self::Tenant(id) if id.trim().is_empty() => Err("tenant id must not be blank".into()),
            _ => Ok(()),
        }
    }

    /// The owning tenant, if any.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Tenant(id) => Some(id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Tenant(id) => write!(f, "tenant {id}"),
        }
    }
}

/// A well-formed identifier for one kind of record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Checks `value` against the kind's format and wraps it.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the length or any character is wrong.
    pub fn parse(kind: EntityKind, value: &str) -> Result<Self, FormatError> {
        kind.template().validate(value)?;
        Ok(Self(value.to_string()))
    }

    /// Wraps a string already known to be well-formed (generator output, store rows).
    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named inputs a template derives its segments from.
pub type Attributes = BTreeMap<String, String>;

/// Input to one call of [`CodeGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Kind of record the code is for.
    pub kind: EntityKind,
    /// Template inputs, keyed by attribute name.
    pub attributes: Attributes,
    /// Uniqueness boundary to check against.
    pub scope: Scope,
    /// Draw random tails from a generator seeded with this value.
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// A globally scoped request with no attributes.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, attributes: Attributes::new(), scope: Scope::Global, seed: None }
    }

    /// Adds one attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the uniqueness scope.
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Makes random tails deterministic.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
