//! # gatekeep-rules: named attribute-based grant rules
//!
//! Evaluates named predicate rules against the attributes of a single
//! authorization request. Each rule either grants the request or abstains;
//! combining outcomes into a final allow/deny is left to the host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Host                                        │
//! │  (Identity + Resource/Request Attributes)    │
//! └─────────────────┬───────────────────────────┘
//!                   │  rule name + EvaluationContext
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  RuleEvaluator                               │
//! │  ├─ Look up rule by name                     │
//! │  └─ Run its predicate against the context    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Outcome                                     │
//! │  - Grant                                     │
//! │  - Indeterminate (abstain)                   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Built-in Rules
//!
//! - **has-private-visibility**: resource `visibility` is `"Private"`
//! - **has-public-visibility**: resource `visibility` is `"Public"`
//! - **only-resource-owner**: caller `sub` equals resource `resourceOwner`
//!
//! ## Examples
//!
//! ```
//! use gatekeep_rules::{RuleEvaluator, RuleError};
//! use gatekeep_types::{EvaluationContext, Outcome, Visibility};
//!
//! let evaluator = RuleEvaluator::with_builtins();
//!
//! let ctx = EvaluationContext::default()
//!     .with_subject("user-42")
//!     .with_resource_owner("user-42")
//!     .with_visibility(Visibility::Private);
//!
//! assert_eq!(evaluator.evaluate("only-resource-owner", &ctx)?, Outcome::Grant);
//! assert_eq!(evaluator.evaluate("has-public-visibility", &ctx)?, Outcome::Indeterminate);
//! assert!(matches!(
//!     evaluator.evaluate("no-such-rule", &ctx),
//!     Err(RuleError::UnknownRule(_))
//! ));
//! # Ok::<(), RuleError>(())
//! ```
//!
//! Custom rules are plain closures:
//!
//! ```
//! use gatekeep_rules::RuleEvaluator;
//! use gatekeep_types::{EvaluationContext, Outcome};
//!
//! let mut evaluator = RuleEvaluator::new();
//! evaluator.register("is-admin", |ctx: &EvaluationContext| {
//!     Outcome::from_grant(ctx.identity_value("role") == Some("admin"))
//! })?;
//! # Ok::<(), gatekeep_rules::RuleError>(())
//! ```

pub mod builtin;
pub mod error;
pub mod evaluator;
pub mod predicate;
pub mod shared;

// Kani proofs for bounded model checking
#[cfg(kani)]
mod kani_proofs;

pub use error::{Result, RuleError};
pub use evaluator::RuleEvaluator;
pub use gatekeep_config::DuplicatePolicy;
pub use predicate::{Predicate, Rule};
pub use shared::SharedRuleEvaluator;
