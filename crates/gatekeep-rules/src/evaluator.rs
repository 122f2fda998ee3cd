//! Rule registry and evaluation engine.
//!
//! Rules are registered by name and evaluated one at a time against a
//! request context. The evaluator never combines outcomes; that is the
//! host's decision.

use std::collections::HashMap;

use gatekeep_config::{DuplicatePolicy, GatekeepConfig};
use gatekeep_types::{EvaluationContext, Outcome};
use tracing::{debug, info, warn};

use crate::builtin::{self, BUILTIN_RULE_NAMES};
use crate::error::{Result, RuleError};
use crate::predicate::{Predicate, Rule};

// ============================================================================
// RuleEvaluator
// ============================================================================

/// A registry of named rules.
///
/// Registration needs `&mut self`; evaluation only `&self`. Build the
/// evaluator at startup, then share it (for example behind an `Arc`) across
/// request handlers with no further locking. Use
/// [`SharedRuleEvaluator`](crate::SharedRuleEvaluator) when rules must change
/// while traffic is flowing.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    rules: HashMap<String, Rule>,
    on_duplicate: DuplicatePolicy,
    /// Whether each evaluation emits a debug event.
    audit_enabled: bool,
}

impl RuleEvaluator {
    /// Creates an empty evaluator that rejects duplicate names.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            on_duplicate: DuplicatePolicy::Reject,
            audit_enabled: true,
        }
    }

    /// Creates an evaluator holding every built-in rule.
    pub fn with_builtins() -> Self {
        let mut evaluator = Self::new();
        evaluator.insert_builtins(&[]);
        evaluator
    }

    /// Creates an evaluator as described by the `registry` and `audit`
    /// sections of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownRule`] if `registry.disabled_builtins`
    /// names something that is not a built-in rule.
    pub fn from_config(config: &GatekeepConfig) -> Result<Self> {
        let disabled = &config.registry.disabled_builtins;
        if let Some(unknown) = disabled
            .iter()
            .find(|name| !BUILTIN_RULE_NAMES.contains(&name.as_str()))
        {
            return Err(RuleError::UnknownRule(unknown.clone()));
        }

        let mut evaluator = Self::new().with_duplicate_policy(config.registry.on_duplicate);
        evaluator.audit_enabled = config.audit.log_evaluations;
        if config.registry.builtin_rules {
            evaluator.insert_builtins(disabled);
        }

        info!(
            rules = evaluator.len(),
            on_duplicate = ?evaluator.on_duplicate,
            "Rule evaluator configured"
        );
        Ok(evaluator)
    }

    /// Sets what happens when a name is registered twice.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.on_duplicate = policy;
        self
    }

    /// Disables per-evaluation audit events.
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Registers a rule (builder pattern).
    pub fn with_rule(mut self, rule: Rule) -> Result<Self> {
        self.register_rule(rule)?;
        Ok(self)
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.on_duplicate
    }

    /// Registers `predicate` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::DuplicateRule`] if the name is taken and the
    /// policy is [`DuplicatePolicy::Reject`]. The existing rule is kept.
    /// Under [`DuplicatePolicy::Replace`] the new rule wins.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
    ) -> Result<()> {
        self.register_rule(Rule::new(name, predicate))
    }

    /// Registers an already-built [`Rule`]. See [`register`](Self::register).
    pub fn register_rule(&mut self, rule: Rule) -> Result<()> {
        let name = rule.name().to_string();

        if self.rules.contains_key(&name) {
            match self.on_duplicate {
                DuplicatePolicy::Reject => {
                    warn!(rule = %name, "Duplicate rule rejected");
                    return Err(RuleError::DuplicateRule(name));
                }
                DuplicatePolicy::Replace => {
                    warn!(rule = %name, "Replacing existing rule");
                }
            }
        } else {
            info!(rule = %name, "Rule registered");
        }

        self.rules.insert(name, rule);
        Ok(())
    }

    /// Evaluates the rule registered under `name` against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownRule`] if nothing is registered under
    /// `name`. The caller must not treat this as `Indeterminate`.
    ///
    /// # Postcondition
    ///
    /// For a registered rule, always returns an outcome; the context's shape
    /// cannot cause an error.
    pub fn evaluate(&self, name: &str, ctx: &EvaluationContext) -> Result<Outcome> {
        let Some(rule) = self.rules.get(name) else {
            warn!(rule = %name, "Evaluation requested for unknown rule");
            return Err(RuleError::UnknownRule(name.to_string()));
        };

        let outcome = rule.evaluate(ctx);

        if self.audit_enabled {
            debug!(rule = %name, outcome = %outcome, "Rule evaluated");
        }

        Ok(outcome)
    }

    /// Evaluates several rules against one context.
    ///
    /// Returns one `(name, outcome)` pair per requested name, in request
    /// order. Outcomes are not combined.
    ///
    /// # Errors
    ///
    /// Fails with [`RuleError::UnknownRule`] on the first unregistered name;
    /// no partial result is returned.
    pub fn evaluate_each<'a, I>(
        &self,
        names: I,
        ctx: &EvaluationContext,
    ) -> Result<Vec<(String, Outcome)>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| {
                self.evaluate(name, ctx)
                    .map(|outcome| (name.to_string(), outcome))
            })
            .collect()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Adds built-ins not listed in `skip`. Built-in names are distinct, so
    /// this only collides with rules registered earlier, which are kept.
    fn insert_builtins(&mut self, skip: &[String]) {
        for rule in builtin::builtin_rules() {
            if skip.iter().any(|name| name == rule.name()) {
                debug!(rule = %rule.name(), "Built-in rule disabled by configuration");
                continue;
            }
            self.rules.entry(rule.name().to_string()).or_insert(rule);
        }
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{HAS_PRIVATE_VISIBILITY, HAS_PUBLIC_VISIBILITY, ONLY_RESOURCE_OWNER};
    use gatekeep_types::Visibility;

    fn always(outcome: Outcome) -> impl Fn(&EvaluationContext) -> Outcome + Send + Sync {
        move |_: &EvaluationContext| outcome
    }

    #[test]
    fn test_with_builtins_registers_all() {
        let evaluator = RuleEvaluator::with_builtins();
        assert_eq!(evaluator.len(), 3);
        assert_eq!(
            evaluator.rule_names(),
            vec![HAS_PRIVATE_VISIBILITY, HAS_PUBLIC_VISIBILITY, ONLY_RESOURCE_OWNER]
        );
    }

    #[test]
    fn test_register_and_evaluate_custom_rule() {
        let mut evaluator = RuleEvaluator::new().without_audit();
        evaluator
            .register("has-subject", |ctx: &EvaluationContext| {
                Outcome::from_grant(ctx.subject().is_some())
            })
            .unwrap();

        let anonymous = EvaluationContext::default();
        let known = EvaluationContext::default().with_subject("user-1");

        assert_eq!(evaluator.evaluate("has-subject", &anonymous), Ok(Outcome::Indeterminate));
        assert_eq!(evaluator.evaluate("has-subject", &known), Ok(Outcome::Grant));
    }

    #[test]
    fn test_unknown_rule_is_an_error() {
        let evaluator = RuleEvaluator::with_builtins();
        let result = evaluator.evaluate("nonexistent-rule", &EvaluationContext::default());
        assert_eq!(
            result,
            Err(RuleError::UnknownRule("nonexistent-rule".to_string()))
        );
    }

    #[test]
    fn test_duplicate_rejected_keeps_original() {
        let mut evaluator = RuleEvaluator::new();
        evaluator.register("rule", always(Outcome::Grant)).unwrap();

        let result = evaluator.register("rule", always(Outcome::Indeterminate));

        assert_eq!(result, Err(RuleError::DuplicateRule("rule".to_string())));
        assert_eq!(
            evaluator.evaluate("rule", &EvaluationContext::default()),
            Ok(Outcome::Grant),
            "rejected registration must not replace the existing rule"
        );
    }

    #[test]
    fn test_duplicate_replaced_under_replace_policy() {
        let mut evaluator = RuleEvaluator::new().with_duplicate_policy(DuplicatePolicy::Replace);
        evaluator.register("rule", always(Outcome::Grant)).unwrap();
        evaluator
            .register("rule", always(Outcome::Indeterminate))
            .unwrap();

        assert_eq!(evaluator.len(), 1);
        assert_eq!(
            evaluator.evaluate("rule", &EvaluationContext::default()),
            Ok(Outcome::Indeterminate)
        );
    }

    #[test]
    fn test_builtin_name_collision_is_rejected_by_default() {
        let mut evaluator = RuleEvaluator::with_builtins();
        let result = evaluator.register(ONLY_RESOURCE_OWNER, always(Outcome::Grant));
        assert!(matches!(result, Err(RuleError::DuplicateRule(_))));
    }

    #[test]
    fn test_with_rule_builder() {
        let evaluator = RuleEvaluator::new()
            .with_rule(Rule::new("a", always(Outcome::Grant)))
            .and_then(|e| e.with_rule(Rule::new("b", always(Outcome::Indeterminate))))
            .unwrap();
        assert_eq!(evaluator.rule_names(), vec!["a", "b"]);
        assert!(evaluator.contains("a"));
        assert!(evaluator.rule("b").is_some());
        assert!(evaluator.rule("c").is_none());
    }

    #[test]
    fn test_evaluate_each_preserves_request_order() {
        let evaluator = RuleEvaluator::with_builtins();
        let ctx = EvaluationContext::default().with_visibility(Visibility::Public);

        let outcomes = evaluator
            .evaluate_each([HAS_PUBLIC_VISIBILITY, HAS_PRIVATE_VISIBILITY], &ctx)
            .unwrap();

        assert_eq!(
            outcomes,
            vec![
                (HAS_PUBLIC_VISIBILITY.to_string(), Outcome::Grant),
                (HAS_PRIVATE_VISIBILITY.to_string(), Outcome::Indeterminate),
            ]
        );
    }

    #[test]
    fn test_evaluate_each_fails_on_unknown_name() {
        let evaluator = RuleEvaluator::with_builtins();
        let result = evaluator.evaluate_each(
            [HAS_PUBLIC_VISIBILITY, "typo-rule", HAS_PRIVATE_VISIBILITY],
            &EvaluationContext::default(),
        );
        assert_eq!(result, Err(RuleError::UnknownRule("typo-rule".to_string())));
    }

    #[test]
    fn test_from_default_config() {
        let evaluator = RuleEvaluator::from_config(&GatekeepConfig::default()).unwrap();
        assert_eq!(evaluator.len(), BUILTIN_RULE_NAMES.len());
        assert_eq!(evaluator.duplicate_policy(), DuplicatePolicy::Reject);
        assert!(evaluator.audit_enabled);
    }

    #[test]
    fn test_from_config_without_builtins() {
        let evaluator = RuleEvaluator::from_config(&GatekeepConfig::empty()).unwrap();
        assert!(evaluator.is_empty());
        assert!(!evaluator.audit_enabled);
    }

    #[test]
    fn test_from_config_skips_disabled_builtins() {
        let mut config = GatekeepConfig::default();
        config.registry.disabled_builtins = vec![HAS_PUBLIC_VISIBILITY.to_string()];
        config.registry.on_duplicate = DuplicatePolicy::Replace;

        let evaluator = RuleEvaluator::from_config(&config).unwrap();

        assert!(!evaluator.contains(HAS_PUBLIC_VISIBILITY));
        assert_eq!(
            evaluator.rule_names(),
            vec![HAS_PRIVATE_VISIBILITY, ONLY_RESOURCE_OWNER]
        );
        assert_eq!(evaluator.duplicate_policy(), DuplicatePolicy::Replace);
    }

    #[test]
    fn test_from_config_rejects_unknown_disabled_name() {
        let mut config = GatekeepConfig::default();
        config.registry.disabled_builtins = vec!["has-secret-visibility".to_string()];

        let result = RuleEvaluator::from_config(&config);

        assert!(
            matches!(result, Err(RuleError::UnknownRule(ref name)) if name == "has-secret-visibility")
        );
    }

    #[test]
    fn test_evaluator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleEvaluator>();
    }
}
