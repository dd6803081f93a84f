//! Payout Property Test Suite
//!
//! Behavioral guarantees of the selector and evaluator:
//! - Line trigger gating and wild fallback
//! - DepthSquared and PerSymbol scaling
//! - Truncated reels
//! - TotalCount grouping and wild exclusion
//! - Reservation depletion and reel caps

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rf_slot_core::{
    Grid, PayScaling, PaylinePattern, ReelDrawState, ReelSelector, ReelStrip, SlotMachine,
    SymbolCatalog, SymbolDef, SymbolId, WinMode, WinSource, evaluate_wins,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

/// One-row grid holding `names` left to right
fn row_grid(catalog: &SymbolCatalog, names: &[&str]) -> Grid {
    let columns: Vec<Vec<SymbolId>> = names
        .iter()
        .map(|n| vec![catalog.id_of(n).unwrap()])
        .collect();
    Grid::from_columns(&columns)
}

fn full_line(len: usize) -> Vec<PaylinePattern> {
    vec![PaylinePattern::new((0..len).collect(), 1)]
}

// ═══════════════════════════════════════════════════════════════════════════════
// LINE PASS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn non_triggering_leftmost_symbol_blocks_line() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::regular("A", 10, 1, 1.0),
        SymbolDef::regular("NEG", 10, -1, 1.0),
        SymbolDef::regular("SOLO", 10, 1, 1.0).with_win_mode(WinMode::SingleOnReel),
        SymbolDef::scatter("SCAT", 10, 9, 4, 1.0),
    ]);

    for leftmost in ["NEG", "SOLO", "SCAT"] {
        let grid = row_grid(&catalog, &[leftmost, "A", "A", "A"]);
        let wins = evaluate_wins(&catalog, &grid, &full_line(4), &1u64);
        assert!(
            wins.iter().all(|w| !w.is_line()),
            "{} should not start a line",
            leftmost
        );
    }
}

#[test]
fn leading_wilds_adopt_later_trigger() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::wild("WILD", 1.0),
        SymbolDef::regular("PAY", 25, 3, 1.0),
    ]);
    let grid = row_grid(&catalog, &["WILD", "WILD", "PAY"]);
    let wins = evaluate_wins(&catalog, &grid, &full_line(3), &1u64);

    assert_eq!(wins.len(), 1);
    assert_eq!(wins[0].symbol, catalog.id_of("PAY").unwrap());
    assert_eq!(wins[0].match_count, 3);
    assert_eq!(wins[0].value, 25);
}

#[test]
fn depth_squared_doubles_per_extra_match() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::regular("A", 10, 3, 1.0),
        SymbolDef::regular("X", 1, 3, 1.0),
    ]);

    let mut previous = None;
    for run in 3..=6 {
        let mut names = vec!["A"; run];
        names.resize(7, "X");
        let grid = row_grid(&catalog, &names);
        let wins = evaluate_wins(&catalog, &grid, &full_line(7), &1u64);

        let value = wins
            .iter()
            .find(|w| w.symbol == catalog.id_of("A").unwrap())
            .map(|w| w.value)
            .unwrap();
        if let Some(prev) = previous {
            assert_eq!(value, prev * 2, "run of {}", run);
        }
        previous = Some(value);
    }
    assert_eq!(previous, Some(80));
}

#[test]
fn per_symbol_counts_matches_past_the_break() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::regular("A", 10, 1, 1.0).with_scaling(PayScaling::PerSymbol),
        SymbolDef::regular("B", 3, 3, 1.0),
    ]);
    let grid = row_grid(&catalog, &["A", "B", "A"]);
    let wins = evaluate_wins(&catalog, &grid, &full_line(3), &1u64);

    assert_eq!(wins.len(), 1);
    assert_eq!(wins[0].match_count, 1);
    assert_eq!(wins[0].value, 20);
    assert_eq!(wins[0].cells, vec![0, 2]);
}

#[test]
fn zero_row_reel_yields_no_wins() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::regular("A", 10, 1, 1.0),
        SymbolDef::regular("B", 10, 3, 1.0),
        SymbolDef::wild("WILD", 1.0),
    ]);

    for name in ["A", "B", "WILD"] {
        let id = catalog.id_of(name).unwrap();
        let grid = Grid::new(3, vec![1, 0, 1], vec![Some(id), Some(id), Some(id)]);
        let wins = evaluate_wins(&catalog, &grid, &[PaylinePattern::new(vec![0, 1, 2], 1)], &1u64);
        assert!(wins.is_empty(), "{} paid across a zero-row reel", name);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GROUP PASS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn total_count_group_pays_once() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::scatter("MOON", 5, 3, 9, 1.0),
        SymbolDef::scatter("STAR", 5, 3, 9, 1.0),
        SymbolDef::regular("A", 10, 3, 1.0),
    ]);
    let grid = row_grid(&catalog, &["MOON", "A", "STAR", "MOON"]);
    let wins = evaluate_wins(&catalog, &grid, &[], &1u64);

    assert_eq!(wins.len(), 1);
    assert_eq!(wins[0].source, WinSource::SymbolGroup);
    assert_eq!(wins[0].match_count, 3);
    assert_eq!(wins[0].cells, vec![0, 2, 3]);
    assert_eq!(wins[0].value, 5);
}

#[test]
fn zero_base_bonus_group_emits_one_record() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::scatter("BONUS", 0, 3, 9, 1.0),
        SymbolDef::regular("A", 10, 3, 1.0),
    ]);
    let grid = row_grid(&catalog, &["BONUS", "A", "BONUS", "BONUS"]);
    let wins = evaluate_wins(&catalog, &grid, &[], &1u64);

    assert_eq!(wins.len(), 1);
    assert_eq!(wins[0].source, WinSource::SymbolGroup);
    assert_eq!(wins[0].value, 0);
    assert_eq!(wins[0].cells, vec![0, 2, 3]);
}

#[test]
fn wilds_never_self_award() {
    let mut wild = SymbolDef::wild("WILD", 1.0)
        .with_win_mode(WinMode::TotalCount)
        .with_group(3);
    wild.base_value = 100;
    wild.total_count_trigger = 1;
    let catalog = SymbolCatalog::new(vec![wild]);

    let id = catalog.id_of("WILD").unwrap();
    let grid = Grid::from_columns(&vec![vec![id, id, id]; 5]);
    let shape = grid.shape().clone();
    let patterns = rf_slot_core::standard_patterns(&shape);

    assert!(evaluate_wins(&catalog, &grid, &patterns, &1u64).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTOR
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn depleting_reservation_fills_its_strip() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::regular("A", 10, 3, 5.0),
        SymbolDef::regular("B", 10, 3, 5.0),
        SymbolDef::regular("FIXED", 10, 3, 1.0).with_reservation(12, true),
    ]);
    let strip = ReelStrip::full(0, &catalog, 12);
    let selector = ReelSelector::new(&catalog, &strip).unwrap();
    let mut state = ReelDrawState::new(&strip, &catalog);
    let mut rng = ChaCha8Rng::seed_from_u64(2026);

    let drawn = (0..12)
        .filter(|_| selector.draw(&mut state, &mut rng, true).unwrap().name == "FIXED")
        .count();

    assert_eq!(drawn, 12);
    assert_eq!(state.remaining(2), 0);
    assert_eq!(state.draws_remaining(), 0);
}

#[test]
fn reel_cap_excludes_symbol_with_reserved_slots() {
    let catalog = SymbolCatalog::new(vec![
        SymbolDef::regular("CAPPED", 10, 3, 0.0)
            .with_reservation(3, true)
            .with_max_per_reel(1),
        SymbolDef::regular("FILL", 1, 3, 1.0),
    ]);
    let strip = ReelStrip::full(0, &catalog, 6);
    let selector = ReelSelector::new(&catalog, &strip).unwrap();

    for seed in 0..25 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = selector.new_state();
        let mut landed = 0;

        for _ in 0..6 {
            if selector.draw(&mut state, &mut rng, true).unwrap().name == "CAPPED" {
                landed += 1;
            }
            if landed == 1 {
                // filler draws respect the cap as well
                assert_eq!(selector.draw(&mut state, &mut rng, false).unwrap().name, "FILL");
            }
        }
        assert_eq!(landed, 1, "seed {}", seed);
        assert_eq!(state.remaining(0), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// END TO END
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn seeded_session_pays_something() {
    let mut engine = SlotMachine::demo().unwrap();
    engine.seed(31337);
    for _ in 0..500 {
        let result = engine.spin().unwrap();
        assert_eq!(result.total_win, result.wins.iter().map(|w| w.value).sum::<u64>());
    }

    let stats = engine.stats();
    assert_eq!(stats.total_spins, 500);
    assert!(stats.wins > 0);
    assert!(stats.rtp() > 0.0);
}
