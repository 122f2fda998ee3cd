//! Rule registry errors.
//!
//! Both variants are configuration mistakes. They are never retried and
//! never downgraded to an `Indeterminate` outcome.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// No rule is registered under this name.
    #[error("Unknown rule: '{0}'")]
    UnknownRule(String),

    /// A rule is already registered under this name.
    #[error("Duplicate rule: '{0}' is already registered")]
    DuplicateRule(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RuleError>;
