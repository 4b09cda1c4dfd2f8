//! Framework error type.
//!
//! Sub-crates define their own error enums and convert `FerryError` into them
//! via `From` impls, so configuration failures surface unchanged at the top.

use thiserror::Error;

/// The top-level error type for `fc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FerryError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fc-*` crates.
pub type FerryResult<T> = Result<T, FerryError>;
