//! # gatekeep-types: Core types for `gatekeep`
//!
//! This crate contains the request-side types shared across the workspace:
//! - Multi-valued attribute maps ([`Attributes`])
//! - The per-request evaluation context ([`EvaluationContext`])
//! - Rule outcomes ([`Outcome`])
//! - Resource visibility ([`Visibility`])
//! - Well-known attribute keys ([`keys`])
//! - Claim-token encoding used by hosts to push resource claims ([`claims`])

use std::{
    collections::BTreeMap,
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

pub mod claims;

pub use claims::ClaimsError;

// ============================================================================
// Attribute Keys
// ============================================================================

/// Attribute names produced by the identity provider and the resource model.
///
/// Keys are matched exactly; the host must emit them with this spelling.
pub mod keys {
    /// Authenticated subject identifier (identity attribute).
    pub const SUBJECT: &str = "sub";

    /// Resource visibility, `"Public"` or `"Private"` (context attribute).
    pub const VISIBILITY: &str = "visibility";

    /// Subject identifier of the resource owner (context attribute).
    pub const RESOURCE_OWNER: &str = "resourceOwner";
}

// ============================================================================
// Outcome
// ============================================================================

/// The result of evaluating a single rule.
///
/// There is no `Deny`: a rule whose condition is unmet abstains. How
/// abstentions count toward the final decision is up to the host's
/// combination strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The rule grants the request.
    Grant,
    /// The rule has no opinion.
    Indeterminate,
}

impl Outcome {
    /// Maps a predicate result onto an outcome.
    pub fn from_grant(granted: bool) -> Self {
        if granted {
            Self::Grant
        } else {
            Self::Indeterminate
        }
    }

    pub fn is_grant(self) -> bool {
        matches!(self, Self::Grant)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grant => write!(f, "Grant"),
            Self::Indeterminate => write!(f, "Indeterminate"),
        }
    }
}

// ============================================================================
// Visibility
// ============================================================================

/// Visibility of a shared resource (photo, album).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible to any authenticated user.
    Public,
    /// Visible to the owner only.
    Private,
}

impl Visibility {
    /// Returns the exact attribute literal for this visibility.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not an exact visibility literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility: {0:?}")]
pub struct ParseVisibilityError(pub String);

impl FromStr for Visibility {
    type Err = ParseVisibilityError;

    /// Parses `"Public"` or `"Private"`. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Public" => Ok(Self::Public),
            "Private" => Ok(Self::Private),
            other => Err(ParseVisibilityError(other.to_string())),
        }
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// A map from attribute name to an ordered list of string values.
///
/// Attributes are multi-valued; values keep insertion order. Rules read
/// through [`Attributes::first`], which reports a missing attribute as
/// `None` rather than an empty string, so absence can never compare equal
/// to an expected literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Vec<String>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute (builder pattern).
    pub fn with<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(key, values);
        self
    }

    /// Inserts an attribute, replacing any previous values under `key`.
    pub fn insert<K, I, V>(&mut self, key: K, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Returns the first value of `key`, or `None` if the attribute is
    /// absent or carries no values.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value of `key` in insertion order.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for (key, values) in iter {
            attributes.insert(key, values);
        }
        attributes
    }
}

// ============================================================================
// Evaluation Context
// ============================================================================

/// Everything a rule may look at for one authorization request.
///
/// Built fresh by the host for each request and handed to the evaluator by
/// reference. Rules only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Attributes of the requesting identity (e.g. `sub`).
    #[serde(default)]
    identity: Attributes,
    /// Resource and request attributes (e.g. `visibility`, `resourceOwner`).
    #[serde(default)]
    context: Attributes,
}

impl EvaluationContext {
    pub fn new(identity: Attributes, context: Attributes) -> Self {
        Self { identity, context }
    }

    pub fn identity(&self) -> &Attributes {
        &self.identity
    }

    pub fn context(&self) -> &Attributes {
        &self.context
    }

    /// First value of the identity attribute `key`.
    pub fn identity_value(&self, key: &str) -> Option<&str> {
        self.identity.first(key)
    }

    /// First value of the context attribute `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.first(key)
    }

    /// The authenticated subject identifier, if the identity carries one.
    pub fn subject(&self) -> Option<&str> {
        self.identity_value(keys::SUBJECT)
    }

    pub fn with_identity_attribute<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.identity.insert(key, values);
        self
    }

    pub fn with_context_attribute<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.context.insert(key, values);
        self
    }

    /// Sets the identity's `sub` attribute.
    pub fn with_subject(self, subject: impl Into<String>) -> Self {
        let subject: String = subject.into();
        self.with_identity_attribute(keys::SUBJECT, [subject])
    }

    /// Sets the context's `resourceOwner` attribute.
    pub fn with_resource_owner(self, owner: impl Into<String>) -> Self {
        let owner: String = owner.into();
        self.with_context_attribute(keys::RESOURCE_OWNER, [owner])
    }

    /// Sets the context's `visibility` attribute.
    pub fn with_visibility(self, visibility: Visibility) -> Self {
        self.with_context_attribute(keys::VISIBILITY, [visibility.as_str()])
    }
}

#[cfg(test)]
mod tests;
