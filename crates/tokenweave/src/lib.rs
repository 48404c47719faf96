//! Tokenweave - dependency analysis for design-token systems.
//!
//! This crate analyzes the alias structure of a token system (depth, cycles,
//! blast radius, validation) and projects it into render-ready
//! visualizations: a token dependency graph and a mode/platform chord
//! diagram. A thin CLI is built on top of the library.
//!
//! # Example
//!
//! ```
//! use tokenweave::analysis::DependencyAnalyzer;
//! use tokenweave::domain::{TokenId, TokenSystem};
//!
//! let system = TokenSystem::from_json(r##"{
//!     "tokens": [
//!         { "id": "brand", "resolvedValueTypeId": "color",
//!           "valuesByMode": [{ "modeIds": [], "value": "#0055ff" }] },
//!         { "id": "button", "resolvedValueTypeId": "color",
//!           "valuesByMode": [{ "modeIds": [], "value": { "tokenId": "brand" } }] }
//!     ]
//! }"##)?;
//!
//! let analysis = DependencyAnalyzer::default().analyze(&system)?;
//! assert_eq!(analysis.depth_of(&TokenId::from("button")), Some(1));
//! assert!(analysis.validation.is_valid);
//! # Ok::<(), tokenweave::Error>(())
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod transform;

// Public CLI module (needed by binary)
pub mod cli;

// Internal modules (not exposed as public API)
pub(crate) mod output;

pub use error::{Error, Result};
