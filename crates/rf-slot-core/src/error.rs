//! Error types for the payout core

use thiserror::Error;

use crate::symbols::SymbolId;

/// Authored machine data that cannot be spun correctly
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON document failed to parse
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML document failed to parse
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A limit from `ConfigLimits` was exceeded
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Reel or payline references a symbol name that is not in the catalog
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Two catalog entries share a name
    #[error("Duplicate symbol name: {0}")]
    DuplicateSymbol(String),

    /// Reel has no symbols to draw from
    #[error("Reel {reel} has an empty symbol catalog")]
    EmptyReel { reel: usize },

    /// Reel catalog has zero total weight and no reservation
    #[error("Reel {reel} has zero total weight and no reserved symbols")]
    ZeroWeightReel { reel: usize },

    /// Symbol weight is negative or not finite
    #[error("Invalid weight {weight} for symbol {name}")]
    InvalidWeight { name: String, weight: f64 },

    /// Grid has no columns
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Payline pattern violates its shape invariants
    #[error("Invalid payline {index}: {reason}")]
    InvalidPayline { index: usize, reason: String },
}

/// Failure to produce a symbol from a reel catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Catalog has no entries
    #[error("Cannot draw from an empty reel catalog")]
    EmptyCatalog,

    /// Every entry has zero weight and none is reserved
    #[error("Reel catalog has zero total weight and no reserved symbols")]
    ZeroWeight,

    /// Reel references an id outside the symbol catalog
    #[error("Symbol {0} is not in the catalog")]
    UnknownSymbol(SymbolId),

    /// Weighted choice rejected the candidate weights
    #[error("Weighted choice failed: {0}")]
    Weights(String),
}

/// Fault raised while evaluating a single payline pattern
///
/// Never escapes `WinEvaluator::evaluate`; the pattern is skipped and logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Pattern has no cells")]
    EmptyPattern,

    #[error("Pattern starts in column {0}, expected column 0")]
    NotAnchored(usize),

    #[error("Grid cell {cell} holds symbol {symbol} which is not in the catalog")]
    UnknownSymbol { cell: usize, symbol: SymbolId },
}
