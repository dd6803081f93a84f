//! Win evaluation: paylines and grid-wide symbol groups
//!
//! Two passes run over a landed grid:
//!
//! 1. **Line pass**: each payline pattern is walked from column 0 while cells
//!    keep matching the trigger. Patterns are independent, so one cell may
//!    contribute to several line wins.
//! 2. **Group pass**: `SingleOnReel` symbols pay per landed instance;
//!    `TotalCount` symbols pay once per group when enough instances land
//!    anywhere on the grid. Wilds never take part in this pass.
//!
//! Evaluation never fails as a whole. A fault inside one pattern is logged and
//! that pattern is skipped; the rest of the spin is still paid.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::grid::Grid;
use crate::paylines::PaylinePattern;
use crate::symbols::{PayScaling, SymbolCatalog, SymbolDef, SymbolId, WinMode};

/// Supplies the active bet's credit cost at evaluation time
pub trait CreditSource {
    fn credit_cost(&self) -> u64;
}

impl CreditSource for u64 {
    fn credit_cost(&self) -> u64 {
        *self
    }
}

/// What produced a win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinSource {
    /// Payline at this index in the pattern list
    Line(usize),
    /// SingleOnReel or TotalCount group win
    SymbolGroup,
}

/// One satisfied rule for one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub source: WinSource,
    /// Trigger symbol
    pub symbol: SymbolId,
    /// Matches that qualified the win
    pub match_count: u32,
    /// Final payout in credits
    pub value: u64,
    /// Contributing flat grid indices, in evaluation order
    pub cells: Vec<usize>,
}

impl WinRecord {
    pub fn is_line(&self) -> bool {
        matches!(self.source, WinSource::Line(_))
    }
}

/// Saturating sum of win values
pub fn total_payout(wins: &[WinRecord]) -> u64 {
    wins.iter().fold(0u64, |acc, w| acc.saturating_add(w.value))
}

/// `base_value` scaled by the symbol's `PayScaling`
///
/// `extra_depth` drives `DepthSquared`, `count` drives `PerSymbol`.
pub fn scaled_payout(def: &SymbolDef, extra_depth: u32, count: u32) -> u64 {
    let base = u64::try_from(def.base_value).unwrap_or(0);
    match def.pay_scaling {
        PayScaling::DepthSquared => {
            let factor = 1u64.checked_shl(extra_depth).unwrap_or(u64::MAX);
            base.saturating_mul(factor)
        }
        PayScaling::PerSymbol => base.saturating_mul(u64::from(count)),
    }
}

/// Stateless evaluator over a symbol catalog
#[derive(Debug, Clone, Copy)]
pub struct WinEvaluator<'a> {
    catalog: &'a SymbolCatalog,
}

impl<'a> WinEvaluator<'a> {
    pub fn new(catalog: &'a SymbolCatalog) -> Self {
        Self { catalog }
    }

    /// Every win earned by `grid`: line wins in pattern order, then group wins
    pub fn evaluate(&self, grid: &Grid, patterns: &[PaylinePattern], bet: &dyn CreditSource) -> Vec<WinRecord> {
        let credit = bet.credit_cost();
        let mut wins = Vec::new();

        for (index, pattern) in patterns.iter().enumerate() {
            match self.evaluate_line(grid, index, pattern, credit) {
                Ok(Some(win)) => wins.push(win),
                Ok(None) => {}
                Err(e) => log::warn!("payline {} skipped: {}", index, e),
            }
        }

        wins.extend(self.evaluate_single_on_reel(grid, credit));
        wins.extend(self.evaluate_total_count(grid, credit));
        wins
    }

    /// Evaluate collaborator data in flat form
    ///
    /// Mismatched dimensions are padded (see `Grid::new`).
    pub fn evaluate_flat(
        &self,
        columns: usize,
        rows_per_column: Vec<usize>,
        cells: Vec<Option<SymbolId>>,
        patterns: &[PaylinePattern],
        bet: &dyn CreditSource,
    ) -> Vec<WinRecord> {
        let grid = Grid::new(columns, rows_per_column, cells);
        self.evaluate(&grid, patterns, bet)
    }

    /// Landed symbol at `cell`, `None` for empty or truncated cells
    fn symbol(&self, grid: &Grid, cell: usize) -> Result<Option<&'a SymbolDef>, EvalError> {
        match grid.cell(cell) {
            None => Ok(None),
            Some(id) => self
                .catalog
                .get(id)
                .map(Some)
                .ok_or(EvalError::UnknownSymbol { cell, symbol: id }),
        }
    }

    /// Resolve the symbol that governs a line, or `None` if the line cannot pay
    fn resolve_trigger(&self, grid: &Grid, pattern: &PaylinePattern) -> Result<Option<&'a SymbolDef>, EvalError> {
        let Some(leading) = self.symbol(grid, pattern.cells[0])? else {
            return Ok(None);
        };
        if leading.triggers_line() {
            return Ok(Some(leading));
        }
        if !leading.is_wild {
            return Ok(None);
        }
        // Leading wild: adopt the first paying line symbol further along
        for &cell in &pattern.cells[1..] {
            if let Some(def) = self.symbol(grid, cell)? {
                if def.adoptable_trigger() {
                    return Ok(Some(def));
                }
            }
        }
        Ok(None)
    }

    fn evaluate_line(
        &self,
        grid: &Grid,
        index: usize,
        pattern: &PaylinePattern,
        credit: u64,
    ) -> Result<Option<WinRecord>, EvalError> {
        let Some(&first) = pattern.cells.first() else {
            return Err(EvalError::EmptyPattern);
        };
        let (column, _) = grid.shape().position(first);
        if column != 0 {
            return Err(EvalError::NotAnchored(column));
        }

        // A zero-row reel anywhere on the line short-circuits it
        let shape = grid.shape();
        if pattern
            .cells
            .iter()
            .any(|&cell| shape.rows_in(shape.position(cell).0) == 0)
        {
            return Ok(None);
        }

        let Some(trigger) = self.resolve_trigger(grid, pattern)? else {
            return Ok(None);
        };
        if trigger.base_value <= 0 {
            return Ok(None);
        }

        // Contiguous walk; the first empty, truncated or mismatching cell ends it
        let mut run = Vec::with_capacity(pattern.len());
        for &cell in &pattern.cells {
            match self.symbol(grid, cell)? {
                Some(def) if trigger.line_matches(def) => run.push(cell),
                _ => break,
            }
        }

        let match_count = run.len() as u32;
        let min_depth = u32::try_from(trigger.min_win_depth).unwrap_or(0);
        if match_count == 0 || match_count < min_depth {
            return Ok(None);
        }
        let extra_depth = match_count - min_depth;

        let (scaled, cells) = match trigger.pay_scaling {
            PayScaling::DepthSquared => (scaled_payout(trigger, extra_depth, match_count), run),
            PayScaling::PerSymbol => {
                // Qualified by the contiguous run, paid on every match in the pattern
                let mut all = Vec::with_capacity(pattern.len());
                for &cell in &pattern.cells {
                    if let Some(def) = self.symbol(grid, cell)? {
                        if trigger.line_matches(def) {
                            all.push(cell);
                        }
                    }
                }
                (scaled_payout(trigger, extra_depth, all.len() as u32), all)
            }
        };

        let value = scaled
            .saturating_mul(u64::from(pattern.multiplier))
            .saturating_mul(credit);

        log::debug!(
            "payline {}: {} x{} (depth +{}) pays {}",
            index,
            trigger.name,
            match_count,
            extra_depth,
            value
        );

        Ok(Some(WinRecord {
            source: WinSource::Line(index),
            symbol: trigger.id,
            match_count,
            value,
            cells,
        }))
    }

    /// Landed cells with their definitions; cells with unknown ids are logged and skipped
    fn landed<'g>(&'g self, grid: &'g Grid) -> impl Iterator<Item = (usize, &'a SymbolDef)> + 'g {
        grid.occupied().filter_map(move |(cell, id)| match self.catalog.get(id) {
            Some(def) => Some((cell, def)),
            None => {
                log::warn!("grid cell {} holds unknown symbol {}, ignored", cell, id);
                None
            }
        })
    }

    fn evaluate_single_on_reel(&self, grid: &Grid, credit: u64) -> Vec<WinRecord> {
        self.landed(grid)
            .filter(|(_, def)| def.win_mode == WinMode::SingleOnReel && !def.is_wild && def.base_value > 0)
            .map(|(cell, def)| WinRecord {
                source: WinSource::SymbolGroup,
                symbol: def.id,
                match_count: 1,
                value: scaled_payout(def, 0, 1).saturating_mul(credit),
                cells: vec![cell],
            })
            .collect()
    }

    fn evaluate_total_count(&self, grid: &Grid, credit: u64) -> Vec<WinRecord> {
        let mut seen = HashSet::new();
        let mut wins = Vec::new();

        for (_, trigger) in self.landed(grid) {
            if trigger.win_mode != WinMode::TotalCount || trigger.is_wild {
                continue;
            }
            let key = trigger.group_key();
            if !seen.insert(key) {
                continue;
            }

            let cells: Vec<usize> = self
                .landed(grid)
                .filter(|(_, def)| !def.is_wild && def.group_key() == key)
                .map(|(cell, _)| cell)
                .collect();

            let count = cells.len() as u32;
            if count == 0 || count < trigger.total_count_trigger {
                continue;
            }
            let extra_depth = count - trigger.total_count_trigger;
            let value = scaled_payout(trigger, extra_depth, count).saturating_mul(credit);

            log::debug!("group {:?}: {} x{} pays {}", key, trigger.name, count, value);

            wins.push(WinRecord {
                source: WinSource::SymbolGroup,
                symbol: trigger.id,
                match_count: count,
                value,
                cells,
            });
        }
        wins
    }
}

/// Evaluate `grid` against `patterns` with a one-off evaluator
pub fn evaluate_wins(
    catalog: &SymbolCatalog,
    grid: &Grid,
    patterns: &[PaylinePattern],
    bet: &dyn CreditSource,
) -> Vec<WinRecord> {
    WinEvaluator::new(catalog).evaluate(grid, patterns, bet)
}
