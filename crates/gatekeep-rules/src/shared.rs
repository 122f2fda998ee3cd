//! A rule registry that can change while it is being evaluated.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gatekeep_types::{EvaluationContext, Outcome};

use crate::error::Result;
use crate::evaluator::RuleEvaluator;
use crate::predicate::{Predicate, Rule};

/// A cloneable handle to a [`RuleEvaluator`] behind a read-write lock.
///
/// Evaluations take the read lock and run concurrently; registration takes
/// the write lock. Predicates are pure and registration either inserts a
/// whole rule or nothing, so a poisoned lock still guards a consistent map
/// and is recovered rather than propagated.
#[derive(Debug, Clone, Default)]
pub struct SharedRuleEvaluator {
    inner: Arc<RwLock<RuleEvaluator>>,
}

impl SharedRuleEvaluator {
    pub fn new(evaluator: RuleEvaluator) -> Self {
        Self {
            inner: Arc::new(RwLock::new(evaluator)),
        }
    }

    /// See [`RuleEvaluator::register`].
    pub fn register(
        &self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
    ) -> Result<()> {
        self.write().register(name, predicate)
    }

    /// See [`RuleEvaluator::register_rule`].
    pub fn register_rule(&self, rule: Rule) -> Result<()> {
        self.write().register_rule(rule)
    }

    /// See [`RuleEvaluator::evaluate`].
    pub fn evaluate(&self, name: &str, ctx: &EvaluationContext) -> Result<Outcome> {
        self.read().evaluate(name, ctx)
    }

    /// See [`RuleEvaluator::evaluate_each`].
    pub fn evaluate_each<'a, I>(
        &self,
        names: I,
        ctx: &EvaluationContext,
    ) -> Result<Vec<(String, Outcome)>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.read().evaluate_each(names, ctx)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copies the current registry into a lock-free evaluator.
    ///
    /// Rules are reference-counted, so this does not copy predicates.
    pub fn snapshot(&self) -> RuleEvaluator {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, RuleEvaluator> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuleEvaluator> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<RuleEvaluator> for SharedRuleEvaluator {
    fn from(evaluator: RuleEvaluator) -> Self {
        Self::new(evaluator)
    }
}
