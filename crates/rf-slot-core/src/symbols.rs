//! Symbol catalog entries and per-reel symbol lists

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a symbol in its `SymbolCatalog`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u16);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which evaluation pass a symbol takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinMode {
    /// Left-to-right match along payline patterns
    #[default]
    LineMatch,
    /// Every landed instance pays on its own
    SingleOnReel,
    /// Pays once when enough instances of the group land anywhere on the grid
    TotalCount,
}

/// How a qualifying match scales `base_value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayScaling {
    /// base × 2^(extra depth)
    #[default]
    DepthSquared,
    /// base × number of matching cells
    PerSymbol,
}

/// Guaranteed instance count within one reel's strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Instances that must land within the strip size
    pub count: u32,
    /// Decrement on every consumed draw of this symbol
    #[serde(default = "default_depleting")]
    pub depleting: bool,
}

fn default_depleting() -> bool {
    true
}

/// Key used to cap instances per reel and to group TotalCount wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Shared positive `match_group_id`
    Group(i32),
    /// Ungrouped symbol, keyed by itself
    Symbol(SymbolId),
}

/// An authored, immutable symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Assigned by `SymbolCatalog`
    #[serde(skip)]
    pub id: SymbolId,
    /// Symbol name (e.g., "HP1", "WILD")
    pub name: String,
    /// Payout unit
    #[serde(default)]
    pub base_value: i64,
    /// Minimum contiguous matches for a line win (negative = never triggers a line)
    #[serde(default = "default_min_win_depth")]
    pub min_win_depth: i32,
    /// Relative draw probability
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_wild: bool,
    /// Wilds may substitute for this symbol
    #[serde(default = "default_allow_wild_match")]
    pub allow_wild_match: bool,
    #[serde(default)]
    pub win_mode: WinMode,
    #[serde(default)]
    pub pay_scaling: PayScaling,
    /// Non-positive = ungrouped
    #[serde(default)]
    pub match_group_id: i32,
    /// Minimum grid-wide count for a TotalCount win
    #[serde(default)]
    pub total_count_trigger: u32,
    /// Negative = unlimited instances per reel per spin
    #[serde(default = "default_max_per_reel")]
    pub max_per_reel: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

fn default_min_win_depth() -> i32 {
    3
}

fn default_weight() -> f64 {
    1.0
}

fn default_allow_wild_match() -> bool {
    true
}

fn default_max_per_reel() -> i32 {
    -1
}

impl SymbolDef {
    /// Create a regular line-paying symbol
    pub fn regular(name: impl Into<String>, base_value: i64, min_win_depth: i32, weight: f64) -> Self {
        Self {
            id: SymbolId::default(),
            name: name.into(),
            base_value,
            min_win_depth,
            weight,
            is_wild: false,
            allow_wild_match: true,
            win_mode: WinMode::LineMatch,
            pay_scaling: PayScaling::DepthSquared,
            match_group_id: 0,
            total_count_trigger: 0,
            max_per_reel: -1,
            reservation: None,
        }
    }

    /// Create a non-paying wild that never triggers on its own
    pub fn wild(name: impl Into<String>, weight: f64) -> Self {
        Self {
            is_wild: true,
            min_win_depth: -1,
            ..Self::regular(name, 0, -1, weight)
        }
    }

    /// Create a scatter-style symbol that pays on grid-wide count
    pub fn scatter(name: impl Into<String>, base_value: i64, trigger: u32, group: i32, weight: f64) -> Self {
        Self {
            win_mode: WinMode::TotalCount,
            total_count_trigger: trigger,
            match_group_id: group,
            allow_wild_match: false,
            ..Self::regular(name, base_value, -1, weight)
        }
    }

    pub fn with_scaling(mut self, scaling: PayScaling) -> Self {
        self.pay_scaling = scaling;
        self
    }

    pub fn with_win_mode(mut self, mode: WinMode) -> Self {
        self.win_mode = mode;
        self
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.match_group_id = group;
        self
    }

    pub fn with_max_per_reel(mut self, max: i32) -> Self {
        self.max_per_reel = max;
        self
    }

    pub fn with_reservation(mut self, count: u32, depleting: bool) -> Self {
        self.reservation = Some(Reservation { count, depleting });
        self
    }

    pub fn with_wild_match(mut self, allow: bool) -> Self {
        self.allow_wild_match = allow;
        self
    }

    /// Can this symbol start a line win on its own
    pub fn triggers_line(&self) -> bool {
        self.min_win_depth >= 0 && self.win_mode == WinMode::LineMatch
    }

    /// Can this symbol be adopted as trigger behind leading wilds
    pub fn adoptable_trigger(&self) -> bool {
        !self.is_wild && self.triggers_line() && self.base_value > 0
    }

    pub fn group_key(&self) -> GroupKey {
        if self.match_group_id > 0 {
            GroupKey::Group(self.match_group_id)
        } else {
            GroupKey::Symbol(self.id)
        }
    }

    /// Does `other` continue a line started by `self` as trigger
    pub fn line_matches(&self, other: &SymbolDef) -> bool {
        if self.id == other.id {
            return true;
        }
        if self.is_wild && other.is_wild {
            return true;
        }
        if self.match_group_id > 0 && self.match_group_id == other.match_group_id {
            return true;
        }
        (self.is_wild && other.allow_wild_match) || (other.is_wild && self.allow_wild_match)
    }

    /// Max instances per reel per spin, `None` = unlimited
    pub fn reel_cap(&self) -> Option<u32> {
        u32::try_from(self.max_per_reel).ok()
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        SymbolId(0)
    }
}

/// Ordered symbol definitions indexed by `SymbolId`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SymbolDef>", into = "Vec<SymbolDef>")]
pub struct SymbolCatalog {
    symbols: Vec<SymbolDef>,
}

impl From<Vec<SymbolDef>> for SymbolCatalog {
    fn from(symbols: Vec<SymbolDef>) -> Self {
        Self::new(symbols)
    }
}

impl From<SymbolCatalog> for Vec<SymbolDef> {
    fn from(catalog: SymbolCatalog) -> Self {
        catalog.symbols
    }
}

/// Largest catalog a `SymbolId` can address
pub const MAX_CATALOG_SYMBOLS: usize = u16::MAX as usize + 1;

impl SymbolCatalog {
    /// Build a catalog, assigning ids by position
    ///
    /// Ids are `u16`, so at most `MAX_CATALOG_SYMBOLS` entries fit; any past
    /// that are dropped with a warning. `MachineConfig::build` rejects such
    /// catalogs up front.
    pub fn new(mut symbols: Vec<SymbolDef>) -> Self {
        if symbols.len() > MAX_CATALOG_SYMBOLS {
            log::warn!(
                "catalog has {} symbols, keeping the first {}",
                symbols.len(),
                MAX_CATALOG_SYMBOLS
            );
            symbols.truncate(MAX_CATALOG_SYMBOLS);
        }
        for (idx, symbol) in symbols.iter_mut().enumerate() {
            if let Ok(id) = u16::try_from(idx) {
                symbol.id = SymbolId(id);
            }
        }
        Self { symbols }
    }

    /// Standard set for a classic 5-reel machine
    /// HP = high paying, LP = low paying
    pub fn standard() -> Self {
        Self::new(vec![
            SymbolDef::regular("HP1", 50, 3, 2.0),
            SymbolDef::regular("HP2", 30, 3, 3.0),
            SymbolDef::regular("HP3", 20, 3, 4.0),
            SymbolDef::regular("LP1", 10, 3, 6.0),
            SymbolDef::regular("LP2", 8, 3, 7.0),
            SymbolDef::regular("LP3", 5, 3, 8.0).with_scaling(PayScaling::PerSymbol),
            SymbolDef::wild("WILD", 1.5).with_max_per_reel(1),
            SymbolDef::scatter("SCATTER", 5, 3, 90, 1.0).with_max_per_reel(1),
            SymbolDef::regular("COIN", 2, -1, 1.0)
                .with_win_mode(WinMode::SingleOnReel)
                .with_wild_match(false)
                .with_max_per_reel(1),
        ])
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolDef> {
        self.symbols.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.by_name(name).map(|s| s.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolDef> {
        self.symbols.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols.iter().map(|s| s.id)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The ordered symbol list a single reel draws from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelStrip {
    /// Reel index
    pub reel_index: usize,
    /// Candidate symbols in authored order
    pub symbols: Vec<SymbolId>,
    /// Draw budget per spin that reservations must fit into
    pub strip_size: u32,
}

impl ReelStrip {
    pub fn new(reel_index: usize, symbols: Vec<SymbolId>, strip_size: u32) -> Self {
        Self {
            reel_index,
            symbols,
            strip_size,
        }
    }

    /// Reel offering every symbol in the catalog
    pub fn full(reel_index: usize, catalog: &SymbolCatalog, strip_size: u32) -> Self {
        Self::new(reel_index, catalog.ids().collect(), strip_size)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_assigns_ids() {
        let catalog = SymbolCatalog::standard();
        for (idx, symbol) in catalog.iter().enumerate() {
            assert_eq!(symbol.id, SymbolId(idx as u16));
        }
        assert_eq!(catalog.id_of("WILD"), Some(SymbolId(6)));
        assert!(catalog.by_name("NOPE").is_none());
    }

    #[test]
    fn test_catalog_stays_within_id_space() {
        let symbols: Vec<SymbolDef> = (0..MAX_CATALOG_SYMBOLS + 2)
            .map(|i| SymbolDef::regular(format!("S{}", i), 1, 3, 1.0))
            .collect();
        let catalog = SymbolCatalog::new(symbols);

        assert_eq!(catalog.len(), MAX_CATALOG_SYMBOLS);
        let last = catalog.iter().last().unwrap();
        assert_eq!(last.id, SymbolId(u16::MAX));
        assert_eq!(catalog.id_of("S0"), Some(SymbolId(0)));
        assert!(catalog.by_name(&format!("S{}", MAX_CATALOG_SYMBOLS)).is_none());
    }

    #[test]
    fn test_line_match_rules() {
        let catalog = SymbolCatalog::new(vec![
            SymbolDef::regular("A", 10, 3, 1.0).with_group(4),
            SymbolDef::regular("A2", 10, 3, 1.0).with_group(4),
            SymbolDef::regular("B", 5, 3, 1.0).with_wild_match(false),
            SymbolDef::wild("W", 1.0),
            SymbolDef::wild("W2", 1.0),
        ]);
        let get = |n: &str| catalog.by_name(n).unwrap();

        assert!(get("A").line_matches(get("A")));
        assert!(get("A").line_matches(get("A2")));
        assert!(get("A").line_matches(get("W")));
        assert!(get("W").line_matches(get("A")));
        assert!(get("W").line_matches(get("W2")));
        assert!(!get("A").line_matches(get("B")));
        assert!(!get("B").line_matches(get("W")));
        assert!(!get("W").line_matches(get("B")));
    }

    #[test]
    fn test_group_key_and_cap() {
        let grouped = SymbolDef::regular("A", 1, 3, 1.0).with_group(7).with_max_per_reel(2);
        assert_eq!(grouped.group_key(), GroupKey::Group(7));
        assert_eq!(grouped.reel_cap(), Some(2));

        let plain = SymbolDef::regular("B", 1, 3, 1.0).with_group(-1);
        assert_eq!(plain.group_key(), GroupKey::Symbol(SymbolId(0)));
        assert_eq!(plain.reel_cap(), None);
    }

    #[test]
    fn test_trigger_gates() {
        assert!(SymbolDef::regular("A", 10, 3, 1.0).triggers_line());
        assert!(!SymbolDef::regular("A", 10, -1, 1.0).triggers_line());
        assert!(!SymbolDef::scatter("S", 5, 3, 9, 1.0).triggers_line());
        assert!(!SymbolDef::wild("W", 1.0).adoptable_trigger());
        assert!(!SymbolDef::regular("Z", 0, 3, 1.0).adoptable_trigger());
    }

    #[test]
    fn test_symbol_def_serde_defaults() {
        let def: SymbolDef = serde_json::from_str(r#"{"name": "HP1", "base_value": 20}"#).unwrap();
        assert_eq!(def.min_win_depth, 3);
        assert_eq!(def.weight, 1.0);
        assert_eq!(def.max_per_reel, -1);
        assert!(def.allow_wild_match);
        assert_eq!(def.win_mode, WinMode::LineMatch);
        assert!(def.reservation.is_none());
    }
}
