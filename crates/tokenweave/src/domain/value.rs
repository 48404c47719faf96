//! Literal-or-alias token values.

use super::TokenId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key that marks a JSON object as an alias.
const ALIAS_KEY: &str = "tokenId";

/// A token value: either a literal or an alias to another token.
///
/// Converts from the document shape, where an alias is an object carrying a
/// string `tokenId`. Literal equality is structural (`serde_json::Value`
/// equality), never by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum TokenValue {
    /// A concrete value (color string, number, composite object, ...)
    Literal(Value),

    /// A reference to another token
    Alias(TokenId),
}

impl TokenValue {
    /// The aliased token id, if this is an alias.
    #[must_use]
    pub fn alias_target(&self) -> Option<&TokenId> {
        match self {
            Self::Alias(id) => Some(id),
            Self::Literal(_) => None,
        }
    }

    /// Canonical serialized form, used to count distinct values.
    ///
    /// `serde_json` orders object keys, so equal values serialize equally.
    #[must_use]
    pub fn serialized(&self) -> String {
        Value::from(self.clone()).to_string()
    }
}

impl From<Value> for TokenValue {
    fn from(value: Value) -> Self {
        if let Value::Object(map) = &value {
            if let Some(Value::String(target)) = map.get(ALIAS_KEY) {
                if map.len() > 1 {
                    tracing::warn!(
                        target_token = %target,
                        extra_keys = map.len() - 1,
                        "Alias value carries extra keys; treating as alias"
                    );
                }
                return Self::Alias(TokenId::new(target.clone()));
            }
        }
        Self::Literal(value)
    }
}

impl From<TokenValue> for Value {
    fn from(value: TokenValue) -> Self {
        match value {
            TokenValue::Literal(literal) => literal,
            TokenValue::Alias(id) => {
                let mut map = serde_json::Map::new();
                map.insert(ALIAS_KEY.to_string(), Value::String(id.0));
                Value::Object(map)
            }
        }
    }
}
