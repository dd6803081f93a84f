//! Slot machine engine: draws a grid per spin and pays it

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{MachineConfig, MachineSetup};
use crate::error::{ConfigError, DrawError};
use crate::evaluator::{CreditSource, WinEvaluator};
use crate::grid::{Grid, GridShape};
use crate::paylines::PaylinePattern;
use crate::selector::{ReelDrawState, ReelSelector};
use crate::spin::{SessionStats, SpinResult};
use crate::symbols::{ReelStrip, SymbolCatalog, SymbolId};

/// Slot machine engine
///
/// Owns the authored machine data and an injected, seedable random source.
/// Each spin starts every reel from a fresh `ReelDrawState`.
pub struct SlotMachine {
    /// Machine name
    name: String,
    /// Symbol catalog
    catalog: SymbolCatalog,
    /// Per-reel symbol lists
    strips: Vec<ReelStrip>,
    /// Grid shape
    shape: GridShape,
    /// Payline patterns, fixed for the grid shape
    patterns: Vec<PaylinePattern>,
    /// Random number generator
    rng: ChaCha8Rng,
    /// Credit cost of the active bet
    credit_cost: u64,
    /// Off-screen rows drawn per reel
    decoration_rows: usize,
    /// Current spin count
    spin_count: u64,
    /// Current session stats
    stats: SessionStats,
}

impl SlotMachine {
    /// Create from a resolved setup
    pub fn new(setup: MachineSetup) -> Self {
        let rng = match setup.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        log::info!(
            "machine '{}' ready: {} reels, {} paylines, {} symbols",
            setup.name,
            setup.shape.columns(),
            setup.patterns.len(),
            setup.catalog.len()
        );
        Self {
            name: setup.name,
            catalog: setup.catalog,
            strips: setup.strips,
            shape: setup.shape,
            patterns: setup.patterns,
            rng,
            credit_cost: setup.credit_cost,
            decoration_rows: setup.decoration_rows,
            spin_count: 0,
            stats: SessionStats::default(),
        }
    }

    /// Validate and build from authored config
    pub fn from_config(config: &MachineConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.build()?))
    }

    /// Built-in demo machine
    pub fn demo() -> Result<Self, ConfigError> {
        Self::from_config(&MachineConfig::demo())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Set bet credit cost
    pub fn set_credit_cost(&mut self, credit_cost: u64) {
        self.credit_cost = credit_cost;
    }

    /// Replace the payline set (e.g., after a grid shape change)
    pub fn set_patterns(&mut self, patterns: Vec<PaylinePattern>) -> Result<(), ConfigError> {
        crate::paylines::validate_patterns(&patterns, &self.shape)?;
        self.patterns = patterns;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    pub fn patterns(&self) -> &[PaylinePattern] {
        &self.patterns
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reset session stats
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
        self.spin_count = 0;
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Execute a random spin
    pub fn spin(&mut self) -> Result<SpinResult, DrawError> {
        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);

        let (grid, decorations) = self.draw_grid()?;
        let wins = WinEvaluator::new(&self.catalog).evaluate(&grid, &self.patterns, &self.credit_cost);
        let result = SpinResult::new(spin_id, grid, self.credit_cost)
            .with_wins(wins)
            .with_decorations(decorations);

        log::debug!(
            "{}: {} wins, total {}",
            result.spin_id,
            result.wins.len(),
            result.total_win
        );
        self.stats.record(&result);
        Ok(result)
    }

    /// Pay a caller-supplied grid at the current bet without touching stats
    pub fn evaluate_grid(&self, grid: &Grid) -> SpinResult {
        let wins = WinEvaluator::new(&self.catalog).evaluate(grid, &self.patterns, &self.credit_cost);
        SpinResult::new("external".into(), grid.clone(), self.credit_cost).with_wins(wins)
    }

    /// Draw visible cells (consumed) and decoration rows (filler) for every reel
    fn draw_grid(&mut self) -> Result<(Grid, Vec<Vec<SymbolId>>), DrawError> {
        let mut grid = Grid::empty(self.shape.clone());
        let mut decorations = Vec::with_capacity(self.strips.len());

        for (column, strip) in self.strips.iter().enumerate() {
            let selector = ReelSelector::new(&self.catalog, strip)?;
            let mut state: ReelDrawState = selector.new_state();

            for row in 0..self.shape.rows_in(column) {
                let def = selector.draw(&mut state, &mut self.rng, true)?;
                grid.set(column, row, Some(def.id));
            }

            let filler = (0..self.decoration_rows)
                .map(|_| selector.draw(&mut state, &mut self.rng, false).map(|d| d.id))
                .collect::<Result<Vec<_>, _>>()?;
            decorations.push(filler);
        }
        Ok((grid, decorations))
    }
}

impl CreditSource for SlotMachine {
    fn credit_cost(&self) -> u64 {
        self.credit_cost
    }
}
