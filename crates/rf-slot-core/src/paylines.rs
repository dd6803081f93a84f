//! Payline patterns and the standard pattern generator

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::GridShape;

/// An ordered run of flat grid indices checked left to right
///
/// Always starts in column 0 and never moves back a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaylinePattern {
    /// Flat grid indices (`row * columns + column`)
    pub cells: Vec<usize>,
    /// Applied to every win on this line
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

fn default_multiplier() -> u32 {
    1
}

impl PaylinePattern {
    pub fn new(cells: Vec<usize>, multiplier: u32) -> Self {
        Self { cells, multiplier }
    }

    /// Convert a row-per-reel line (e.g., `[1, 0, 0, 0, 1]`) into flat indices
    ///
    /// Every row must exist on its reel. A zero-row reel accepts only row 0,
    /// which leaves the line crossing it unpaid.
    pub fn from_rows(rows: &[usize], shape: &GridShape, multiplier: u32) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPayline { index: 0, reason };

        if rows.len() > shape.columns() {
            return Err(invalid(format!(
                "{} row positions for a grid with {} reels",
                rows.len(),
                shape.columns()
            )));
        }
        let mut cells = Vec::with_capacity(rows.len());
        for (column, &row) in rows.iter().enumerate() {
            let rows_in = shape.rows_in(column);
            if row >= rows_in.max(1) {
                return Err(invalid(format!(
                    "row {} on reel {} which has {} rows",
                    row, column, rows_in
                )));
            }
            cells.push(shape.index(column, row));
        }
        Ok(Self { cells, multiplier })
    }

    /// Generator form: rows past a short reel are clamped to its last row
    fn from_rows_clipped(rows: &[usize], shape: &GridShape, multiplier: u32) -> Self {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(column, &row)| {
                let row = row.min(shape.rows_in(column).saturating_sub(1));
                shape.index(column, row)
            })
            .collect();
        Self { cells, multiplier }
    }

    /// Same row across all reels
    pub fn straight(row: usize, shape: &GridShape) -> Self {
        let rows = vec![row; shape.columns()];
        Self::from_rows_clipped(&rows, shape, 1)
    }

    /// Rises toward the middle reel, then falls back
    pub fn v_shape(shape: &GridShape) -> Self {
        let reels = shape.columns();
        let mid = reels / 2;
        let rows: Vec<usize> = (0..reels)
            .map(|i| if i <= mid { i } else { reels - 1 - i })
            .collect();
        Self::from_rows_clipped(&rows, shape, 1)
    }

    /// Mirror of `v_shape`
    pub fn inverted_v(shape: &GridShape) -> Self {
        let top = shape.max_rows().saturating_sub(1);
        let reels = shape.columns();
        let mid = reels / 2;
        let rows: Vec<usize> = (0..reels)
            .map(|i| {
                let depth = if i <= mid { i } else { reels - 1 - i };
                top.saturating_sub(depth)
            })
            .collect();
        Self::from_rows_clipped(&rows, shape, 1)
    }

    /// Alternates between the bottom and top rows
    pub fn zigzag(shape: &GridShape, start_low: bool) -> Self {
        let top = shape.max_rows().saturating_sub(1);
        let rows: Vec<usize> = (0..shape.columns())
            .map(|i| if (i % 2 == 0) == start_low { 0 } else { top })
            .collect();
        Self::from_rows_clipped(&rows, shape, 1)
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check shape invariants; `index` is only used for the error message
    pub fn validate(&self, index: usize, shape: &GridShape) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPayline { index, reason };

        let Some(&first) = self.cells.first() else {
            return Err(invalid("pattern has no cells".into()));
        };
        if shape.columns() == 0 {
            return Err(invalid("grid has no reels".into()));
        }
        if shape.position(first).0 != 0 {
            return Err(invalid(format!("starts in column {}", shape.position(first).0)));
        }

        let mut previous_column = 0;
        for &cell in &self.cells {
            if cell >= shape.capacity() {
                return Err(invalid(format!("cell {} is outside the grid", cell)));
            }
            let (column, _) = shape.position(cell);
            if column < previous_column {
                return Err(invalid(format!(
                    "moves back from column {} to {}",
                    previous_column, column
                )));
            }
            previous_column = column;
        }
        Ok(())
    }
}

/// Standard line set for a shape: straights, V, inverted V and both zigzags
///
/// Lines that collapse onto an earlier one (e.g., on a single-row grid) are dropped.
pub fn standard_patterns(shape: &GridShape) -> Vec<PaylinePattern> {
    let mut candidates: Vec<PaylinePattern> = (0..shape.max_rows())
        .map(|row| PaylinePattern::straight(row, shape))
        .collect();
    candidates.push(PaylinePattern::v_shape(shape));
    candidates.push(PaylinePattern::inverted_v(shape));
    candidates.push(PaylinePattern::zigzag(shape, true));
    candidates.push(PaylinePattern::zigzag(shape, false));

    let mut patterns: Vec<PaylinePattern> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !patterns.iter().any(|p| p.cells == candidate.cells) {
            patterns.push(candidate);
        }
    }
    patterns
}

/// Validate a full pattern list against a shape
pub fn validate_patterns(patterns: &[PaylinePattern], shape: &GridShape) -> Result<(), ConfigError> {
    patterns
        .iter()
        .enumerate()
        .try_for_each(|(index, pattern)| pattern.validate(index, shape))
}
