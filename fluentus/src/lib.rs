#![forbid(unsafe_code)]
//! Round-trip editing toolkit for Fluent (`.ftl`) localization projects.
//!
//! A project is a folder with one subdirectory per locale, each holding `.ftl`
//! files. [`TranslationStore`] loads such a folder into flat, editable
//! [`TranslationRecord`]s and writes them back without losing comments or
//! text the parser could not structure.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fluentus::{Config, Edit, TranslationStore};
//!
//! let mut store = TranslationStore::open("locales", Config::default())?;
//! println!("{}", store.get("welcome", "en")?.value);
//!
//! if store.update("welcome", "de", Edit::value("Willkommen"))? {
//!     store.save(None)?;
//! }
//! # Ok::<(), fluentus::Error>(())
//! ```
//!
//! # Layers
//!
//! - [`parser`] and [`serializer`]: text ↔ [`ast::Resource`], never failing on
//!   bad input (it becomes `Junk` and is written back verbatim)
//! - [`converter`]: syntax tree entries ↔ [`TranslationRecord`], including the
//!   `@check: true` review flag kept in comments
//! - [`store`]: the per-project cache with `load`, `get`, `update` and `save`

pub mod ast;
pub mod config;
pub mod converter;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod store;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    ast::Resource,
    config::Config,
    converter::{Converter, Normalized, normalize},
    error::Error,
    parser::{parse, parse_value},
    serializer::{Serializer, pattern_text, serialize},
    store::TranslationStore,
    types::{Edit, TranslationRecord},
};
