//! Domain types for design-token systems.
//!
//! This module contains the token system model consumed by the analysis
//! engine. It carries data only; every derived structure lives in
//! [`crate::analysis`] or [`crate::transform`].
//!
//! # Values
//!
//! A token value is either a literal or an alias to another token. In the
//! JSON document an alias is an object carrying a `tokenId` string; anything
//! else is a literal. The distinction is resolved once at deserialization
//! into [`TokenValue`], so downstream code pattern-matches instead of probing
//! for keys.

mod value;

pub use value::TokenValue;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Unique identifier for a token
    TokenId
);
string_id!(
    /// Identifier of a mode within a dimension
    ModeId
);
string_id!(
    /// Identifier of a dimension (a named axis of modes)
    DimensionId
);
string_id!(
    /// Identifier of a platform
    PlatformId
);
string_id!(
    /// Identifier of a resolved value type descriptor
    ValueTypeId
);

/// One entry of a token's `valuesByMode` list.
///
/// An entry with an empty `mode_ids` set is the token's global value and
/// must be the only entry of that token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeValue {
    /// Modes this value applies to (set semantics)
    #[serde(default)]
    pub mode_ids: Vec<ModeId>,

    /// The literal or alias value
    pub value: TokenValue,
}

impl ModeValue {
    /// Returns `true` if this entry is the token's global value.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.mode_ids.is_empty()
    }

    /// Returns `true` if this entry applies to the given mode explicitly.
    #[must_use]
    pub fn applies_to(&self, mode: &ModeId) -> bool {
        self.mode_ids.contains(mode)
    }
}

/// A design token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Unique identifier
    pub id: TokenId,

    /// Human-readable name
    #[serde(default)]
    pub display_name: String,

    /// Reference to the value-type descriptor
    pub resolved_value_type_id: ValueTypeId,

    /// Values per mode combination, in document order
    #[serde(default)]
    pub values_by_mode: Vec<ModeValue>,
}

impl Token {
    /// Iterate the alias targets of this token, one per aliasing entry.
    ///
    /// Targets may repeat when several entries alias the same token.
    pub fn alias_targets(&self) -> impl Iterator<Item = &TokenId> {
        self.values_by_mode
            .iter()
            .filter_map(|entry| entry.value.alias_target())
    }

    /// Returns `true` if any mode value is an alias.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.alias_targets().next().is_some()
    }

    /// The baseline value: the first `valuesByMode` entry.
    #[must_use]
    pub fn baseline(&self) -> Option<&TokenValue> {
        self.values_by_mode.first().map(|entry| &entry.value)
    }

    /// The value of the entry that names `mode` explicitly, if any.
    #[must_use]
    pub fn explicit_value_for_mode(&self, mode: &ModeId) -> Option<&TokenValue> {
        self.values_by_mode
            .iter()
            .find(|entry| entry.applies_to(mode))
            .map(|entry| &entry.value)
    }

    /// The value that applies under `mode`, falling back to the global entry.
    #[must_use]
    pub fn resolved_value_for_mode(&self, mode: &ModeId) -> Option<&TokenValue> {
        self.explicit_value_for_mode(mode).or_else(|| {
            self.values_by_mode
                .iter()
                .find(|entry| entry.is_global())
                .map(|entry| &entry.value)
        })
    }
}

/// A mode (e.g. light or dark) within a dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    /// Unique identifier
    pub id: ModeId,

    /// Display name
    #[serde(default)]
    pub name: String,
}

/// A named axis of modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    /// Unique identifier
    pub id: DimensionId,

    /// Display name
    #[serde(default)]
    pub display_name: String,

    /// Modes of this dimension, in display order
    #[serde(default)]
    pub modes: Vec<Mode>,
}

/// A delivery platform (web, iOS, Android, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    /// Unique identifier
    pub id: PlatformId,

    /// Display name
    #[serde(default)]
    pub display_name: String,
}

/// A value-type descriptor (color, dimension, font family, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedValueType {
    /// Unique identifier
    pub id: ValueTypeId,

    /// Display name
    #[serde(default)]
    pub display_name: String,
}

/// A platform-specific replacement of a token's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOverride {
    /// Platform applying the override
    pub platform_id: PlatformId,

    /// Token being overridden
    pub token_id: TokenId,

    /// Replacement value
    pub value: TokenValue,
}

/// A mode together with the dimension it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ModeRef<'a> {
    /// The owning dimension
    pub dimension: &'a Dimension,
    /// The mode itself
    pub mode: &'a Mode,
}

/// Snapshot of a complete token system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSystem {
    /// All tokens, in document order
    pub tokens: Vec<Token>,

    /// Value-type descriptors
    #[serde(default)]
    pub resolved_value_types: Vec<ResolvedValueType>,

    /// Dimensions and their modes
    #[serde(default)]
    pub dimensions: Vec<Dimension>,

    /// Platforms
    #[serde(default)]
    pub platforms: Vec<Platform>,

    /// Platform-specific value overrides
    #[serde(default)]
    pub platform_overrides: Vec<PlatformOverride>,
}

impl TokenSystem {
    /// Parse a token system from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the document has no `tokens`
    /// array, and [`Error::Json`] for any other malformed content.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    /// Parse a token system from a reader producing JSON.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TokenSystem::from_json`].
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_value(document)
    }

    fn from_value(document: serde_json::Value) -> Result<Self> {
        match document.get("tokens") {
            Some(serde_json::Value::Array(_)) => {}
            Some(serde_json::Value::Null) | None => {
                return Err(Error::InvalidInput(
                    "token system has no `tokens` collection".to_string(),
                ));
            }
            Some(_) => {
                return Err(Error::InvalidInput(
                    "`tokens` must be an array".to_string(),
                ));
            }
        }
        let system: Self = serde_json::from_value(document)?;
        tracing::debug!(
            tokens = system.tokens.len(),
            dimensions = system.dimensions.len(),
            platforms = system.platforms.len(),
            "Loaded token system"
        );
        Ok(system)
    }

    /// Check the input contract before any analysis runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if two tokens share an id, if a
    /// token mixes a global entry with other entries, or if a mode or
    /// platform id is declared twice. Mode ids are global: token entries
    /// name modes without their dimension.
    pub fn check_contract(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.tokens.len());
        for token in &self.tokens {
            if !seen.insert(&token.id) {
                return Err(Error::InvalidInput(format!(
                    "duplicate token id: {}",
                    token.id
                )));
            }
            let has_global = token.values_by_mode.iter().any(ModeValue::is_global);
            if has_global && token.values_by_mode.len() > 1 {
                return Err(Error::InvalidInput(format!(
                    "token {} mixes a global value with mode-specific values",
                    token.id
                )));
            }
        }

        let mut modes = HashSet::new();
        for mode_ref in self.modes() {
            if !modes.insert(&mode_ref.mode.id) {
                return Err(Error::InvalidInput(format!(
                    "mode id {} is declared more than once (again in dimension {})",
                    mode_ref.mode.id, mode_ref.dimension.id
                )));
            }
        }

        let mut platforms = HashSet::with_capacity(self.platforms.len());
        for platform in &self.platforms {
            if !platforms.insert(&platform.id) {
                return Err(Error::InvalidInput(format!(
                    "duplicate platform id: {}",
                    platform.id
                )));
            }
        }
        Ok(())
    }

    /// All modes across all dimensions, in dimension then mode order.
    #[must_use]
    pub fn modes(&self) -> Vec<ModeRef<'_>> {
        self.dimensions
            .iter()
            .flat_map(|dimension| {
                dimension
                    .modes
                    .iter()
                    .map(move |mode| ModeRef { dimension, mode })
            })
            .collect()
    }

    /// Look up a token by id.
    #[must_use]
    pub fn token(&self, id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| &token.id == id)
    }

    /// Display name of a value type, falling back to its id.
    #[must_use]
    pub fn value_type_name(&self, id: &ValueTypeId) -> String {
        self.resolved_value_types
            .iter()
            .find(|value_type| &value_type.id == id)
            .filter(|value_type| !value_type.display_name.is_empty())
            .map_or_else(|| id.to_string(), |value_type| value_type.display_name.clone())
    }
}
