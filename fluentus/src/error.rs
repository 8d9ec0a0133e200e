//! All error types for the fluentus crate.
//!
//! Parsing never fails (unparseable text becomes `Junk`), so these are returned
//! from store lookups, edits, conversions and file I/O.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("variable `{key}` not found")]
    KeyNotFound { key: String },

    #[error("locale `{locale}` not found for variable `{key}`")]
    LocaleNotFound { key: String, locale: String },

    #[error("missing filepath for variable `{key}`, locale `{locale}`")]
    MissingSourcePath { key: String, locale: String },

    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("conversion error: {message}")]
    Conversion {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` is not inside the project folder `{}`", path.display(), root.display())]
    OutsideProject { path: PathBuf, root: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new conversion error with optional source error
    pub fn conversion_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Conversion {
            message: message.into(),
            source,
        }
    }

    /// Returns `true` for the lookup failures raised by `get`/`update`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::KeyNotFound { .. } | Error::LocaleNotFound { .. }
        )
    }
}
