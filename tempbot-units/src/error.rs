//! Errors raised while building the unit catalog

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("dimension '{name}' is declared more than once")]
    DuplicateDimension { name: String },

    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },

    #[error("dimension '{name}' has no units")]
    EmptyDimension { name: String },

    #[error("dimension '{name}' has an invalid range [{min:?}, {max:?}]")]
    InvalidRange {
        name: String,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("failed to compile unit label pattern: {0}")]
    Pattern(#[from] regex::Error),
}
