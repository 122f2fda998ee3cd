//! Built-in rules.
//!
//! - **has-private-visibility**: grant if the resource's `visibility` is `"Private"`
//! - **has-public-visibility**: grant if the resource's `visibility` is `"Public"`
//! - **only-resource-owner**: grant if the caller's `sub` equals the resource's `resourceOwner`
//!
//! Every comparison is exact and case-sensitive against the first value of
//! each attribute. A missing attribute never matches.

use gatekeep_types::{EvaluationContext, Outcome, Visibility, keys};

use crate::predicate::{Predicate, Rule};

pub const HAS_PRIVATE_VISIBILITY: &str = "has-private-visibility";
pub const HAS_PUBLIC_VISIBILITY: &str = "has-public-visibility";
pub const ONLY_RESOURCE_OWNER: &str = "only-resource-owner";

/// Names of all built-in rules, in registration order.
pub const BUILTIN_RULE_NAMES: [&str; 3] = [
    HAS_PRIVATE_VISIBILITY,
    HAS_PUBLIC_VISIBILITY,
    ONLY_RESOURCE_OWNER,
];

/// Grants when the context's `visibility` is exactly the given literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEquals(pub Visibility);

impl Predicate for VisibilityEquals {
    fn evaluate(&self, ctx: &EvaluationContext) -> Outcome {
        let visibility = ctx.context_value(keys::VISIBILITY);
        Outcome::from_grant(visibility == Some(self.0.as_str()))
    }
}

/// Grants when the caller is the resource owner.
///
/// An identity without `sub` abstains rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlyResourceOwner;

impl Predicate for OnlyResourceOwner {
    fn evaluate(&self, ctx: &EvaluationContext) -> Outcome {
        match (ctx.subject(), ctx.context_value(keys::RESOURCE_OWNER)) {
            (Some(subject), Some(owner)) => Outcome::from_grant(subject == owner),
            _ => Outcome::Indeterminate,
        }
    }
}

/// Returns every built-in rule, in the order of [`BUILTIN_RULE_NAMES`].
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(HAS_PRIVATE_VISIBILITY, VisibilityEquals(Visibility::Private)),
        Rule::new(HAS_PUBLIC_VISIBILITY, VisibilityEquals(Visibility::Public)),
        Rule::new(ONLY_RESOURCE_OWNER, OnlyResourceOwner),
    ]
}
