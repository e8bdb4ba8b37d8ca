//! Error types shared by the generator, the registry port, and the CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code::EntityKind;

/// Failure reaching or reading the code registry.
///
/// Serializable so recorded sessions can replay store faults.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreError {
    /// The store could not be reached or the query failed.
    #[error("code store unavailable: {0}")]
    Unavailable(String),
    /// A stored row could not be decoded.
    #[error("corrupt row in code store: {0}")]
    Corrupt(String),
    /// The request named a scope the store cannot key on.
    #[error("invalid scope: {0}")]
    InvalidScope(String),
}

/// Failure inserting a new record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertError {
    /// The code was taken between the existence check and the insert.
    #[error("{kind} code {code} is already taken")]
    DuplicateKey {
        /// Kind of the rejected record.
        kind: EntityKind,
        /// The conflicting code.
        code: String,
    },
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure allocating a code.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A required attribute is missing or malformed. The store was not consulted.
    #[error("invalid attributes for {kind}: {reason}")]
    InvalidAttributes {
        /// Kind being generated.
        kind: EntityKind,
        /// What was wrong with the attributes.
        reason: String,
    },
    /// Every candidate within the retry ceiling was already taken.
    #[error("could not allocate a unique {kind} code after {attempts} attempts, please retry")]
    GenerationExhausted {
        /// Kind being generated.
        kind: EntityKind,
        /// Number of candidates checked against the store.
        attempts: u32,
    },
    /// The existence check failed.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// Failure of the full generate-then-insert sequence.
#[derive(Debug, Error)]
pub enum CreateError {
    /// Code generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// The insert hit a duplicate key on the retry as well.
    #[error("{kind} code {code} was taken by a concurrent insert twice in a row, please retry")]
    DuplicateKey {
        /// Kind being created.
        kind: EntityKind,
        /// Code rejected on the final insert.
        code: String,
    },
    /// The store failed during the insert.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A code that does not match its kind's format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Wrong number of characters.
    #[error("{kind} codes are {expected} characters long, got {actual}")]
    Length {
        /// Kind checked against.
        kind: EntityKind,
        /// Required length.
        expected: usize,
        /// Length of the candidate.
        actual: usize,
    },
    /// The literal prefix does not match.
    #[error("{kind} codes start with {expected}, got {found}")]
    Prefix {
        /// Kind checked against.
        kind: EntityKind,
        /// Required literal.
        expected: &'static str,
        /// What the candidate had in that place.
        found: String,
    },
    /// A character outside the position's class.
    #[error("{kind} code has {found:?} at position {position}, expected {expected}")]
    Character {
        /// Kind checked against.
        kind: EntityKind,
        /// Zero-based character position.
        position: usize,
        /// Offending character.
        found: char,
        /// Description of the allowed class.
        expected: &'static str,
    },
    /// A month segment outside `01..=12`.
    #[error("{kind} code has month {found}, expected 01-12")]
    Month {
        /// Kind checked against.
        kind: EntityKind,
        /// The two month digits.
        found: String,
    },
}

/// Failure loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid YAML for [`crate::config::Config`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },
    /// An environment override has an unusable value.
    #[error("invalid value for {name}: {value}")]
    Env {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
    /// A setting is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_message_asks_caller_to_retry() {
        let err = GenerateError::GenerationExhausted { kind: EntityKind::Student, attempts: 100 };
        assert_eq!(
            err.to_string(),
            "could not allocate a unique student code after 100 attempts, please retry"
        );
    }

    #[test]
    fn store_errors_pass_through_unchanged() {
        let err = GenerateError::from(StoreError::Unavailable("connection reset".into()));
        assert_eq!(err.to_string(), "code store unavailable: connection reset");
    }

    #[test]
    fn insert_error_round_trips_through_json() {
        let err = InsertError::DuplicateKey { kind: EntityKind::Class, code: "CLS10A24001".into() };
        let json = serde_json::to_value(&err).unwrap();
        let back: InsertError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
