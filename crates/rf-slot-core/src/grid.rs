//! Jagged symbol grid
//!
//! Columns are reels, each with its own row count. Cells are stored flat and
//! addressed as `row * columns + column`; row 0 is nearest the player.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::symbols::SymbolId;

/// Grid shape (rows per reel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Visible rows on each reel; a zero-row reel is legal
    pub rows_per_column: Vec<usize>,
}

impl GridShape {
    pub fn new(rows_per_column: Vec<usize>) -> Self {
        Self { rows_per_column }
    }

    /// Uniform grid (every reel has `rows` rows)
    pub fn uniform(columns: usize, rows: usize) -> Self {
        Self::new(vec![rows; columns])
    }

    /// Standard 5×3
    pub fn standard_5x3() -> Self {
        Self::uniform(5, 3)
    }

    pub fn columns(&self) -> usize {
        self.rows_per_column.len()
    }

    pub fn rows_in(&self, column: usize) -> usize {
        self.rows_per_column.get(column).copied().unwrap_or(0)
    }

    pub fn max_rows(&self) -> usize {
        self.rows_per_column.iter().copied().max().unwrap_or(0)
    }

    /// Flat capacity, including padding under short reels
    pub fn capacity(&self) -> usize {
        self.columns() * self.max_rows()
    }

    pub fn index(&self, column: usize, row: usize) -> usize {
        row * self.columns() + column
    }

    /// (column, row) of a flat index
    pub fn position(&self, index: usize) -> (usize, usize) {
        let columns = self.columns().max(1);
        (index % columns, index / columns)
    }

    /// Does the flat index address a real cell of this shape
    pub fn contains(&self, index: usize) -> bool {
        let (column, row) = self.position(index);
        self.columns() > 0 && row < self.rows_in(column)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns() == 0 {
            return Err(ConfigError::InvalidGrid("grid must have at least 1 reel".into()));
        }
        if self.max_rows() == 0 {
            return Err(ConfigError::InvalidGrid("grid must have at least 1 row".into()));
        }
        Ok(())
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Landed symbols for one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    shape: GridShape,
    cells: Vec<Option<SymbolId>>,
}

impl Grid {
    /// Build a grid from collaborator data, padding mismatched dimensions
    ///
    /// `rows_per_column` is resized to `columns` (missing reels get 0 rows) and
    /// `cells` to the flat capacity (missing cells are empty).
    pub fn new(columns: usize, mut rows_per_column: Vec<usize>, mut cells: Vec<Option<SymbolId>>) -> Self {
        if rows_per_column.len() != columns {
            log::warn!(
                "grid rows_per_column has {} entries for {} columns, resizing",
                rows_per_column.len(),
                columns
            );
            rows_per_column.resize(columns, 0);
        }
        let shape = GridShape::new(rows_per_column);
        let capacity = shape.capacity();
        if cells.len() != capacity {
            log::warn!("grid has {} cells, shape needs {}, resizing", cells.len(), capacity);
            cells.resize(capacity, None);
        }
        Self { shape, cells }
    }

    /// Empty grid of the given shape
    pub fn empty(shape: GridShape) -> Self {
        let cells = vec![None; shape.capacity()];
        Self { shape, cells }
    }

    /// Build from per-reel columns (index 0 = row 0)
    pub fn from_columns(columns: &[Vec<SymbolId>]) -> Self {
        let shape = GridShape::new(columns.iter().map(Vec::len).collect());
        let mut grid = Self::empty(shape);
        for (column, symbols) in columns.iter().enumerate() {
            for (row, &symbol) in symbols.iter().enumerate() {
                grid.set(column, row, Some(symbol));
            }
        }
        grid
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    pub fn columns(&self) -> usize {
        self.shape.columns()
    }

    /// Symbol at a flat index; `None` for empty, padded or out-of-range cells
    pub fn cell(&self, index: usize) -> Option<SymbolId> {
        if !self.shape.contains(index) {
            return None;
        }
        self.cells.get(index).copied().flatten()
    }

    pub fn at(&self, column: usize, row: usize) -> Option<SymbolId> {
        if row >= self.shape.rows_in(column) {
            return None;
        }
        self.cell(self.shape.index(column, row))
    }

    /// Place a symbol; writes outside the shape are ignored
    pub fn set(&mut self, column: usize, row: usize, symbol: Option<SymbolId>) {
        if row >= self.shape.rows_in(column) {
            return;
        }
        let index = self.shape.index(column, row);
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = symbol;
        }
    }

    /// Real cells in reel order (column, then row)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, SymbolId)> + '_ {
        (0..self.columns()).flat_map(move |column| {
            (0..self.shape.rows_in(column)).filter_map(move |row| {
                let index = self.shape.index(column, row);
                self.cell(index).map(|symbol| (index, symbol))
            })
        })
    }

    /// Column-major copy, one `Vec` per reel
    pub fn to_columns(&self) -> Vec<Vec<Option<SymbolId>>> {
        (0..self.columns())
            .map(|column| {
                (0..self.shape.rows_in(column))
                    .map(|row| self.at(column, row))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_addressing() {
        let shape = GridShape::uniform(5, 3);
        assert_eq!(shape.index(2, 1), 7);
        assert_eq!(shape.position(7), (2, 1));
        assert_eq!(shape.capacity(), 15);
    }

    #[test]
    fn test_jagged_contains() {
        let shape = GridShape::new(vec![1, 0, 1]);
        assert!(shape.contains(0));
        assert!(!shape.contains(1));
        assert!(shape.contains(2));
        assert!(!shape.contains(5));
    }

    #[test]
    fn test_grid_pads_mismatched_input() {
        let grid = Grid::new(3, vec![2], vec![Some(SymbolId(1))]);
        assert_eq!(grid.shape().rows_per_column, vec![2, 0, 0]);
        assert_eq!(grid.cell(0), Some(SymbolId(1)));
        assert_eq!(grid.at(0, 1), None);
        assert_eq!(grid.at(1, 0), None);
    }

    #[test]
    fn test_from_columns_and_occupied_order() {
        let grid = Grid::from_columns(&[
            vec![SymbolId(1), SymbolId(2)],
            vec![],
            vec![SymbolId(3)],
        ]);
        let occupied: Vec<_> = grid.occupied().collect();
        assert_eq!(
            occupied,
            vec![(0, SymbolId(1)), (3, SymbolId(2)), (2, SymbolId(3))]
        );
    }

    #[test]
    fn test_set_outside_shape_ignored() {
        let mut grid = Grid::empty(GridShape::new(vec![1, 2]));
        grid.set(0, 1, Some(SymbolId(4)));
        assert_eq!(grid.at(0, 1), None);
        grid.set(1, 1, Some(SymbolId(4)));
        assert_eq!(grid.at(1, 1), Some(SymbolId(4)));
    }

    #[test]
    fn test_shape_validation() {
        assert!(GridShape::new(vec![]).validate().is_err());
        assert!(GridShape::new(vec![0, 0]).validate().is_err());
        assert!(GridShape::new(vec![0, 3]).validate().is_ok());
    }
}
