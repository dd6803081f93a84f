//! Reel strip selector: weighted per-reel symbol draws
//!
//! Each draw picks one symbol for a reel, honoring two authored constraints:
//!
//! - **Reservations**: an entry may guarantee `count` instances within the
//!   reel's strip size. Reserved entries are weighted by the slots they still
//!   need; everything else shares the leftover slots by authored `weight`.
//! - **Reel caps**: `max_per_reel` limits how many instances of a group (or an
//!   ungrouped symbol) land on one reel in one spin.
//!
//! Draw state is explicit and caller-owned. Create a fresh `ReelDrawState`
//! (or `reset` it) at the start of every spin; never share one across reels.

use std::collections::HashMap;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::error::DrawError;
use crate::symbols::{GroupKey, ReelStrip, SymbolCatalog, SymbolDef, SymbolId};

/// Mutable per-reel, per-spin draw counters
#[derive(Debug, Clone, PartialEq)]
pub struct ReelDrawState {
    strip_size: u32,
    draws_used: u32,
    /// Remaining reserved instances, aligned with the strip's symbol list
    remaining: Vec<u32>,
    /// Consumed draws per cap key
    landed: HashMap<GroupKey, u32>,
}

impl ReelDrawState {
    /// Fresh state for one spin of `strip`
    pub fn new(strip: &ReelStrip, catalog: &SymbolCatalog) -> Self {
        Self::initial(strip.strip_size, strip.symbols.iter().map(|&id| catalog.get(id)))
    }

    /// Initial counters; `defs` is aligned with the strip's symbol list
    fn initial<'d>(strip_size: u32, defs: impl Iterator<Item = Option<&'d SymbolDef>>) -> Self {
        let remaining = defs
            .map(|def| def.and_then(|d| d.reservation).map_or(0, |r| r.count))
            .collect();
        Self {
            strip_size,
            draws_used: 0,
            remaining,
            landed: HashMap::new(),
        }
    }

    /// Reinitialize for a new spin
    pub fn reset(&mut self, strip: &ReelStrip, catalog: &SymbolCatalog) {
        *self = Self::new(strip, catalog);
    }

    pub fn strip_size(&self) -> u32 {
        self.strip_size
    }

    pub fn draws_used(&self) -> u32 {
        self.draws_used
    }

    pub fn draws_remaining(&self) -> u32 {
        self.strip_size.saturating_sub(self.draws_used)
    }

    /// Remaining reserved count for the strip entry at `slot`
    pub fn remaining(&self, slot: usize) -> u32 {
        self.remaining.get(slot).copied().unwrap_or(0)
    }

    /// Consumed draws this spin that share `key`
    pub fn landed(&self, key: GroupKey) -> u32 {
        self.landed.get(&key).copied().unwrap_or(0)
    }

    fn is_capped(&self, def: &SymbolDef) -> bool {
        def.reel_cap()
            .is_some_and(|cap| self.landed(def.group_key()) >= cap)
    }

    fn consume(&mut self, slot: usize, def: &SymbolDef) {
        if def.reservation.is_some_and(|r| r.depleting) {
            if let Some(left) = self.remaining.get_mut(slot) {
                *left = left.saturating_sub(1);
            }
        }
        self.draws_used += 1;
        *self.landed.entry(def.group_key()).or_insert(0) += 1;
    }
}

/// Draws symbols for one reel
#[derive(Debug, Clone)]
pub struct ReelSelector<'a> {
    strip: &'a ReelStrip,
    defs: Vec<&'a SymbolDef>,
}

impl<'a> ReelSelector<'a> {
    /// Resolve the strip against the catalog, failing fast on unusable reels
    pub fn new(catalog: &'a SymbolCatalog, strip: &'a ReelStrip) -> Result<Self, DrawError> {
        if strip.is_empty() {
            return Err(DrawError::EmptyCatalog);
        }
        let defs = strip
            .symbols
            .iter()
            .map(|&id| catalog.get(id).ok_or(DrawError::UnknownSymbol(id)))
            .collect::<Result<Vec<_>, _>>()?;

        let total_weight: f64 = defs.iter().map(|d| d.weight.max(0.0)).sum();
        let reserved = defs
            .iter()
            .any(|d| d.reservation.is_some_and(|r| r.count > 0));
        if total_weight <= 0.0 && !reserved {
            return Err(DrawError::ZeroWeight);
        }

        Ok(Self { strip, defs })
    }

    pub fn strip(&self) -> &ReelStrip {
        self.strip
    }

    /// Fresh draw state for this reel
    pub fn new_state(&self) -> ReelDrawState {
        ReelDrawState::initial(self.strip.strip_size, self.defs.iter().map(|&d| Some(d)))
    }

    /// Reserved slots an entry still claims, `None` if it is in the random pool
    fn reserved_slots(&self, state: &ReelDrawState, slot: usize) -> Option<u32> {
        let reservation = self.defs[slot].reservation?;
        let count = if reservation.depleting {
            state.remaining(slot)
        } else {
            reservation.count
        };
        (count > 0).then_some(count)
    }

    /// Effective weight of every strip entry for the next draw
    ///
    /// Capped entries get weight 0.
    pub fn candidate_weights(&self, state: &ReelDrawState) -> Vec<f64> {
        let draws_remaining = state.draws_remaining();
        let reserved: Vec<Option<u32>> = (0..self.defs.len())
            .map(|slot| self.reserved_slots(state, slot))
            .collect();

        let reserved_total = reserved
            .iter()
            .flatten()
            .map(|&c| u64::from(c))
            .sum::<u64>()
            .min(u64::from(draws_remaining)) as u32;
        let random_pool_size = draws_remaining.saturating_sub(reserved_total);
        let pool_weight: f64 = self
            .defs
            .iter()
            .zip(&reserved)
            .filter(|(_, r)| r.is_none())
            .map(|(d, _)| d.weight.max(0.0))
            .sum();

        self.defs
            .iter()
            .zip(&reserved)
            .map(|(def, reserved)| {
                if state.is_capped(def) {
                    return 0.0;
                }
                match reserved {
                    Some(count) => f64::from((*count).min(draws_remaining)),
                    None if pool_weight > 0.0 => {
                        def.weight.max(0.0) / pool_weight * f64::from(random_pool_size)
                    }
                    None => 0.0,
                }
            })
            .collect()
    }

    /// Draw one symbol
    ///
    /// `consume = false` is a filler draw (off-screen decoration): it reads the
    /// state but leaves reservations and the draw counter untouched.
    ///
    /// When no entry has positive weight, the fallback still skips capped
    /// entries and only ignores caps if every entry is capped.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        state: &mut ReelDrawState,
        rng: &mut R,
        consume: bool,
    ) -> Result<&'a SymbolDef, DrawError> {
        let weights = self.candidate_weights(state);
        let slot = match pick_weighted(&weights, rng)? {
            Some(slot) => slot,
            None => self.fallback_slot(state, rng)?,
        };

        let def = self.defs[slot];
        if consume {
            state.consume(slot, def);
        }
        log::trace!(
            "reel {} drew {} (consume={}, used={}/{})",
            self.strip.reel_index,
            def.name,
            consume,
            state.draws_used(),
            state.strip_size()
        );
        Ok(def)
    }

    /// Pick when no entry has positive effective weight
    ///
    /// Prefers uncapped entries; only if every entry is capped does it reach
    /// into the unfiltered catalog. A symbol is always produced.
    fn fallback_slot<R: Rng + ?Sized>(&self, state: &ReelDrawState, rng: &mut R) -> Result<usize, DrawError> {
        let uncapped: Vec<usize> = (0..self.defs.len())
            .filter(|&slot| !state.is_capped(self.defs[slot]))
            .collect();
        let pool: Vec<usize> = if uncapped.is_empty() {
            log::debug!(
                "reel {}: every symbol is capped, drawing from the full catalog",
                self.strip.reel_index
            );
            (0..self.defs.len()).collect()
        } else {
            uncapped
        };

        let authored: Vec<f64> = pool.iter().map(|&s| self.defs[s].weight.max(0.0)).collect();
        if let Some(i) = pick_weighted(&authored, rng)? {
            return Ok(pool[i]);
        }
        let reserved: Vec<f64> = pool
            .iter()
            .map(|&s| f64::from(self.defs[s].reservation.map_or(0, |r| r.count)))
            .collect();
        if let Some(i) = pick_weighted(&reserved, rng)? {
            return Ok(pool[i]);
        }
        Ok(pool[rng.random_range(0..pool.len())])
    }
}

/// Weighted index over `weights`, `None` if nothing has positive weight
fn pick_weighted<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<Option<usize>, DrawError> {
    if !weights.iter().any(|&w| w > 0.0) {
        return Ok(None);
    }
    let dist = WeightedIndex::new(weights).map_err(|e| DrawError::Weights(e.to_string()))?;
    Ok(Some(dist.sample(rng)))
}

/// Draw one symbol for `strip` using caller-owned `state`
pub fn draw_symbol<'a, R: Rng + ?Sized>(
    catalog: &'a SymbolCatalog,
    strip: &'a ReelStrip,
    state: &mut ReelDrawState,
    rng: &mut R,
    consume: bool,
) -> Result<&'a SymbolDef, DrawError> {
    ReelSelector::new(catalog, strip)?.draw(state, rng, consume)
}

/// Draw `count` consumed symbols for one reel spin, starting from a fresh state
pub fn draw_reel<R: Rng + ?Sized>(
    selector: &ReelSelector<'_>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<SymbolId>, DrawError> {
    let mut state = selector.new_state();
    (0..count)
        .map(|_| selector.draw(&mut state, rng, true).map(|d| d.id))
        .collect()
}
