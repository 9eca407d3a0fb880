//! Errors of the checked constructors and configuration loading.
//!
//! Index operations never return these, a rejected add or remove is a plain `false`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Inverted or non-finite rectangle.
    #[error("invalid bounds [{min_x}, {max_x}] x [{min_y}, {max_y}]")]
    InvalidBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// The configuration text could not be parsed.
    #[cfg(feature = "serde")]
    #[error("failed to parse configuration: {0}")]
    Config(String),
}
