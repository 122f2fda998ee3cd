//! Rule predicates.
//!
//! A predicate is a pure function from an [`EvaluationContext`] to an
//! [`Outcome`]. Predicates must be total: a missing attribute yields
//! `Indeterminate`, never a panic or an error.

use std::fmt;
use std::sync::Arc;

use gatekeep_types::{EvaluationContext, Outcome};

// ============================================================================
// Predicate
// ============================================================================

/// Decides whether a request is granted, based only on its context.
///
/// Implemented for any `Fn(&EvaluationContext) -> Outcome + Send + Sync`,
/// so closures can be registered directly.
pub trait Predicate: Send + Sync {
    fn evaluate(&self, ctx: &EvaluationContext) -> Outcome;
}

impl<F> Predicate for F
where
    F: Fn(&EvaluationContext) -> Outcome + Send + Sync,
{
    fn evaluate(&self, ctx: &EvaluationContext) -> Outcome {
        self(ctx)
    }
}

// ============================================================================
// Rule
// ============================================================================

/// A predicate bound to the name it is registered and looked up under.
#[derive(Clone)]
pub struct Rule {
    name: String,
    predicate: Arc<dyn Predicate>,
}

impl Rule {
    pub fn new(name: impl Into<String>, predicate: impl Predicate + 'static) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, ctx: &EvaluationContext) -> Outcome {
        self.predicate.evaluate(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
