//! Claim-token encoding.
//!
//! Hosts push resource attributes to the authorization server as a
//! `claim_token`: a JSON object of claim name to value list, base64-encoded
//! with the standard alphabet and no padding. The authorization server
//! exposes those claims to rules as context attributes.
//!
//! ```
//! use gatekeep_types::{Attributes, claims};
//!
//! let claims = Attributes::new()
//!     .with("resourceOwner", ["user-42"])
//!     .with("visibility", ["Private"]);
//!
//! let token = claims::encode_claim_token(&claims)?;
//! let decoded = claims::decode_claim_token(&token)?;
//! assert_eq!(decoded, claims);
//! # Ok::<(), gatekeep_types::ClaimsError>(())
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde_json::Value;
use thiserror::Error;

use crate::Attributes;

/// Error type for claim-token decoding.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token is not valid base64.
    #[error("Claim token is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded token is not valid JSON.
    #[error("Claim token is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The claims document is not a JSON object.
    #[error("Claims must be a JSON object")]
    NotAnObject,

    /// A claim value is neither a string nor an array of strings.
    #[error("Claim '{key}' must be a string or an array of strings")]
    UnsupportedValue { key: String },
}

/// Encodes attributes as a claim token.
pub fn encode_claim_token(claims: &Attributes) -> Result<String, ClaimsError> {
    let json = serde_json::to_vec(claims)?;
    Ok(STANDARD_NO_PAD.encode(json))
}

/// Decodes a claim token into attributes.
///
/// Trailing `=` padding is tolerated.
pub fn decode_claim_token(token: &str) -> Result<Attributes, ClaimsError> {
    let bytes = STANDARD_NO_PAD.decode(token.trim_end_matches('='))?;
    let value: Value = serde_json::from_slice(&bytes)?;
    Attributes::from_claims(&value)
}

impl Attributes {
    /// Builds attributes from a JSON claims object.
    ///
    /// Each claim may be a single string, an array of strings, or `null`
    /// (the claim is then omitted).
    pub fn from_claims(claims: &Value) -> Result<Self, ClaimsError> {
        let Value::Object(map) = claims else {
            return Err(ClaimsError::NotAnObject);
        };

        let mut attributes = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => attributes.insert(key.as_str(), [s.as_str()]),
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(Value::as_str)
                        .collect::<Option<Vec<&str>>>()
                        .ok_or_else(|| ClaimsError::UnsupportedValue { key: key.clone() })?;
                    attributes.insert(key.as_str(), values);
                }
                _ => return Err(ClaimsError::UnsupportedValue { key: key.clone() }),
            }
        }
        Ok(attributes)
    }
}
