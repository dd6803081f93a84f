//! Spin result and session statistics

use serde::{Deserialize, Serialize};

use crate::evaluator::{WinRecord, total_payout};
use crate::grid::Grid;
use crate::symbols::SymbolId;

/// Complete outcome of one spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    /// Spin ID
    pub spin_id: String,
    /// Landed grid
    pub grid: Grid,
    /// Off-screen decoration symbols per reel (filler draws, never evaluated)
    pub decorations: Vec<Vec<SymbolId>>,
    /// Credit cost of the bet this spin was played at
    pub bet: u64,
    /// Every win earned this spin
    pub wins: Vec<WinRecord>,
    /// Sum of all win values
    pub total_win: u64,
}

impl SpinResult {
    pub fn new(spin_id: String, grid: Grid, bet: u64) -> Self {
        Self {
            spin_id,
            grid,
            decorations: Vec::new(),
            bet,
            wins: Vec::new(),
            total_win: 0,
        }
    }

    /// Apply evaluated wins
    pub fn with_wins(mut self, wins: Vec<WinRecord>) -> Self {
        self.total_win = total_payout(&wins);
        self.wins = wins;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<Vec<SymbolId>>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    pub fn line_wins(&self) -> impl Iterator<Item = &WinRecord> {
        self.wins.iter().filter(|w| w.is_line())
    }

    pub fn group_wins(&self) -> impl Iterator<Item = &WinRecord> {
        self.wins.iter().filter(|w| !w.is_line())
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0 {
            self.total_win as f64 / self.bet as f64
        } else {
            0.0
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    pub losses: u64,
    pub line_wins: u64,
    pub group_wins: u64,
    pub max_win: u64,
}

impl SessionStats {
    pub fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        self.total_bet = self.total_bet.saturating_add(result.bet);
        self.total_win = self.total_win.saturating_add(result.total_win);

        if result.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.line_wins += result.line_wins().count() as u64;
        self.group_wins += result.group_wins().count() as u64;
        self.max_win = self.max_win.max(result.total_win);
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::WinSource;
    use crate::grid::GridShape;

    fn win(source: WinSource, value: u64) -> WinRecord {
        WinRecord {
            source,
            symbol: SymbolId(0),
            match_count: 3,
            value,
            cells: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_spin_result_totals() {
        let result = SpinResult::new("spin-000001".into(), Grid::empty(GridShape::default()), 2)
            .with_wins(vec![win(WinSource::Line(0), 10), win(WinSource::SymbolGroup, 4)]);

        assert!(result.is_win());
        assert_eq!(result.total_win, 14);
        assert_eq!(result.line_wins().count(), 1);
        assert_eq!(result.group_wins().count(), 1);
        assert_eq!(result.win_ratio(), 7.0);
    }

    #[test]
    fn test_session_stats() {
        let mut stats = SessionStats::default();
        let grid = Grid::empty(GridShape::default());
        stats.record(&SpinResult::new("a".into(), grid.clone(), 1).with_wins(vec![win(WinSource::Line(1), 3)]));
        stats.record(&SpinResult::new("b".into(), grid, 1));

        assert_eq!(stats.total_spins, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.max_win, 3);
        assert_eq!(stats.rtp(), 150.0);
        assert_eq!(stats.hit_rate(), 50.0);
    }
}
