//! # rf-slot-core: Payout core for reel-based slot machines
//!
//! Decides which symbol lands at each reel position and which paylines and
//! symbol groups a landed grid pays.
//!
//! ## Features
//!
//! - **Reel Strip Selector**: weighted draws with reservations and per-reel caps
//! - **Win Evaluation Engine**: payline walks with wild substitution, plus
//!   single-instance and grid-wide count wins
//! - **Jagged Grids**: every reel has its own row count; short reels truncate lines
//! - **Deterministic**: the random source is injected and seedable
//!
//! ## Architecture
//!
//! ```text
//! MachineConfig (JSON / YAML)
//!     │
//!     ├── SymbolCatalog (SymbolDef × N)
//!     ├── ReelStrip × reels ──► ReelSelector + ReelDrawState ──► Grid
//!     └── PaylinePattern × lines                                   │
//!                                                                  v
//!                                      WinEvaluator ──► Vec<WinRecord>
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod paylines;
pub mod selector;
pub mod spin;
pub mod symbols;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use evaluator::*;
pub use grid::*;
pub use paylines::*;
pub use selector::*;
pub use spin::*;
pub use symbols::*;
