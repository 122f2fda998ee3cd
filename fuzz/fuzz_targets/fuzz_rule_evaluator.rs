#![no_main]

use arbitrary::Arbitrary;
use gatekeep_rules::builtin::{HAS_PRIVATE_VISIBILITY, HAS_PUBLIC_VISIBILITY, ONLY_RESOURCE_OWNER};
use gatekeep_rules::{RuleError, RuleEvaluator};
use gatekeep_types::{EvaluationContext, Outcome, keys};
use libfuzzer_sys::fuzz_target;

/// Fuzzer-friendly attribute value list.
///
/// Biased toward the literals the built-in rules compare against so that
/// grant paths are reached, not just abstentions.
#[derive(Debug, Clone, Arbitrary)]
enum FuzzValue {
    Private,
    Public,
    Empty,
    Raw(String),
}

impl FuzzValue {
    fn into_string(self) -> String {
        match self {
            Self::Private => "Private".to_string(),
            Self::Public => "Public".to_string(),
            Self::Empty => String::new(),
            Self::Raw(s) => s,
        }
    }
}

/// Fuzzer-friendly request attributes.
///
/// `None` leaves the attribute out of the context entirely.
#[derive(Debug, Clone, Arbitrary)]
struct FuzzContext {
    sub: Option<Vec<FuzzValue>>,
    resource_owner: Option<Vec<FuzzValue>>,
    visibility: Option<Vec<FuzzValue>>,
    extra_identity: Vec<(String, Vec<String>)>,
    extra_context: Vec<(String, Vec<String>)>,
    rule_name: String,
}

impl FuzzContext {
    fn to_context(&self) -> EvaluationContext {
        let mut ctx = EvaluationContext::default();
        // Well-known keys go last so arbitrary extras cannot shadow them.
        for (key, values) in &self.extra_identity {
            ctx = ctx.with_identity_attribute(key.as_str(), values.iter().cloned());
        }
        for (key, values) in &self.extra_context {
            ctx = ctx.with_context_attribute(key.as_str(), values.iter().cloned());
        }
        if let Some(values) = &self.sub {
            ctx = ctx.with_identity_attribute(keys::SUBJECT, strings(values));
        }
        if let Some(values) = &self.resource_owner {
            ctx = ctx.with_context_attribute(keys::RESOURCE_OWNER, strings(values));
        }
        if let Some(values) = &self.visibility {
            ctx = ctx.with_context_attribute(keys::VISIBILITY, strings(values));
        }
        ctx
    }
}

fn strings(values: &[FuzzValue]) -> Vec<String> {
    values.iter().cloned().map(FuzzValue::into_string).collect()
}

fuzz_target!(|input: FuzzContext| {
    let evaluator = RuleEvaluator::with_builtins().without_audit();
    let ctx = input.to_context();

    // Built-in rules must never fail, whatever the context looks like
    let private = evaluator.evaluate(HAS_PRIVATE_VISIBILITY, &ctx).unwrap();
    let public = evaluator.evaluate(HAS_PUBLIC_VISIBILITY, &ctx).unwrap();
    let owner = evaluator.evaluate(ONLY_RESOURCE_OWNER, &ctx).unwrap();

    validate_invariants(&ctx, private, public, owner);

    // Any other name is an error, never a silent abstention
    if !evaluator.contains(&input.rule_name) {
        assert_eq!(
            evaluator.evaluate(&input.rule_name, &ctx),
            Err(RuleError::UnknownRule(input.rule_name.clone()))
        );
    }
});

/// Checks the built-in rule contracts.
///
/// **Invariants checked:**
/// 1. Visibility rules grant exactly on the literal at index 0
/// 2. The two visibility rules never both grant
/// 3. Ownership grants only when both first values are present and equal
/// 4. Evaluation is deterministic
fn validate_invariants(ctx: &EvaluationContext, private: Outcome, public: Outcome, owner: Outcome) {
    let visibility = ctx.context_value(keys::VISIBILITY);
    assert_eq!(private.is_grant(), visibility == Some("Private"));
    assert_eq!(public.is_grant(), visibility == Some("Public"));

    assert!(!(private.is_grant() && public.is_grant()));

    let owner_matches = matches!(
        (ctx.subject(), ctx.context_value(keys::RESOURCE_OWNER)),
        (Some(sub), Some(resource_owner)) if sub == resource_owner
    );
    assert_eq!(owner.is_grant(), owner_matches);

    let evaluator = RuleEvaluator::with_builtins().without_audit();
    assert_eq!(evaluator.evaluate(ONLY_RESOURCE_OWNER, ctx), Ok(owner));
}
