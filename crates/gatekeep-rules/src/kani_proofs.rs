//! Kani proofs for rule evaluation
//!
//! These proofs check the built-in rules over symbolic attribute presence
//! using bounded model checking.
//!
//! Run with: `cargo kani --harness verify_*`

use gatekeep_types::{EvaluationContext, Outcome, Visibility, keys};

use crate::builtin::{OnlyResourceOwner, VisibilityEquals};
use crate::evaluator::RuleEvaluator;
use crate::predicate::Predicate;

/// Builds a context where each well-known attribute is present or absent
/// according to the given flags, with a fixed value when present.
fn context_from_flags(has_sub: bool, has_owner: bool, has_visibility: bool) -> EvaluationContext {
    let mut ctx = EvaluationContext::default();
    if has_sub {
        ctx = ctx.with_identity_attribute(keys::SUBJECT, ["u"]);
    }
    if has_owner {
        ctx = ctx.with_context_attribute(keys::RESOURCE_OWNER, ["u"]);
    }
    if has_visibility {
        ctx = ctx.with_context_attribute(keys::VISIBILITY, ["Private"]);
    }
    ctx
}

/// Property: an absent attribute never produces a grant.
#[kani::proof]
#[kani::unwind(4)]
fn verify_absent_attribute_never_grants() {
    let has_sub: bool = kani::any();
    let has_owner: bool = kani::any();
    let has_visibility: bool = kani::any();
    let ctx = context_from_flags(has_sub, has_owner, has_visibility);

    if !has_sub || !has_owner {
        assert_eq!(OnlyResourceOwner.evaluate(&ctx), Outcome::Indeterminate);
    }
    if !has_visibility {
        assert_eq!(
            VisibilityEquals(Visibility::Private).evaluate(&ctx),
            Outcome::Indeterminate
        );
    }
}

/// Property: the two visibility rules never both grant.
#[kani::proof]
#[kani::unwind(4)]
fn verify_visibility_rules_mutually_exclusive() {
    let ctx = context_from_flags(kani::any(), kani::any(), kani::any());

    let private = VisibilityEquals(Visibility::Private).evaluate(&ctx);
    let public = VisibilityEquals(Visibility::Public).evaluate(&ctx);

    assert!(!(private.is_grant() && public.is_grant()));
}

/// Property: evaluation is deterministic.
#[kani::proof]
#[kani::unwind(4)]
fn verify_evaluation_determinism() {
    let evaluator = RuleEvaluator::with_builtins().without_audit();
    let ctx = context_from_flags(kani::any(), kani::any(), kani::any());

    let first = evaluator.evaluate("only-resource-owner", &ctx);
    let second = evaluator.evaluate("only-resource-owner", &ctx);

    assert_eq!(first, second);
}
