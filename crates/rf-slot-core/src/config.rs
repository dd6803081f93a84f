//! Machine configuration: authored symbol, reel and payline data
//!
//! Parsed from JSON or YAML, validated against `ConfigLimits`, then resolved
//! into a `MachineSetup` the engine can spin. Every authoring mistake that
//! could produce an incorrect payout fails here, before the first spin.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DrawError};
use crate::grid::GridShape;
use crate::paylines::{PaylinePattern, standard_patterns, validate_patterns};
use crate::selector::ReelSelector;
use crate::symbols::{MAX_CATALOG_SYMBOLS, ReelStrip, SymbolCatalog, SymbolDef};

/// Authored machine description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub grid: GridShape,
    pub symbols: Vec<SymbolDef>,
    /// Per-reel symbol lists; empty = every reel offers every symbol,
    /// a single entry is shared by all reels
    #[serde(default)]
    pub reels: Vec<ReelConfig>,
    #[serde(default)]
    pub paylines: PaylineConfig,
    /// Credit cost of the active bet
    #[serde(default = "default_credit_cost")]
    pub credit_cost: u64,
    /// Off-screen rows drawn above each reel for decoration
    #[serde(default)]
    pub decoration_rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "Untitled".into()
}

fn default_credit_cost() -> u64 {
    1
}

/// Symbols one reel draws from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelConfig {
    /// Symbol names in draw order
    pub symbols: Vec<String>,
    /// Draws per spin that reservations must fit into (default: visible rows)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_size: Option<u32>,
}

/// Payline selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaylineConfig {
    /// Include the generated standard set for the grid shape
    #[serde(default)]
    pub standard: bool,
    /// Extra authored lines
    #[serde(default)]
    pub lines: Vec<LineSpec>,
}

impl Default for PaylineConfig {
    fn default() -> Self {
        Self {
            standard: true,
            lines: Vec::new(),
        }
    }
}

/// A payline in row-per-reel form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    /// Row on each reel, starting at reel 0
    pub rows: Vec<usize>,
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

fn default_multiplier() -> u32 {
    1
}

/// Resolved, validated machine data
#[derive(Debug, Clone)]
pub struct MachineSetup {
    pub name: String,
    pub shape: GridShape,
    pub catalog: SymbolCatalog,
    pub strips: Vec<ReelStrip>,
    pub patterns: Vec<PaylinePattern>,
    pub credit_cost: u64,
    pub decoration_rows: usize,
    pub seed: Option<u64>,
}

impl MachineConfig {
    /// Built-in 5×3 machine on the standard symbol set
    pub fn demo() -> Self {
        Self {
            name: "Demo 5x3".into(),
            grid: GridShape::standard_5x3(),
            symbols: SymbolCatalog::standard().into(),
            reels: Vec::new(),
            paylines: PaylineConfig::default(),
            credit_cost: 1,
            decoration_rows: 1,
            seed: None,
        }
    }

    /// Validate cross references and resolve into a spinnable setup
    pub fn build(&self) -> Result<MachineSetup, ConfigError> {
        self.grid.validate()?;
        check_symbols(&self.symbols)?;

        let catalog = SymbolCatalog::new(self.symbols.clone());
        let strips = self.build_strips(&catalog)?;
        let patterns = self.build_patterns()?;

        Ok(MachineSetup {
            name: self.name.clone(),
            shape: self.grid.clone(),
            catalog,
            strips,
            patterns,
            credit_cost: self.credit_cost,
            decoration_rows: self.decoration_rows,
            seed: self.seed,
        })
    }

    fn build_strips(&self, catalog: &SymbolCatalog) -> Result<Vec<ReelStrip>, ConfigError> {
        let columns = self.grid.columns();
        let all_symbols = || ReelConfig {
            symbols: catalog.iter().map(|s| s.name.clone()).collect(),
            strip_size: None,
        };
        let reels: Vec<ReelConfig> = match self.reels.len() {
            0 => vec![all_symbols(); columns],
            1 => vec![self.reels[0].clone(); columns],
            n if n == columns => self.reels.clone(),
            n => {
                return Err(ConfigError::InvalidGrid(format!(
                    "{} reel definitions for {} reels",
                    n, columns
                )));
            }
        };

        reels
            .iter()
            .enumerate()
            .map(|(reel, config)| {
                let symbols = config
                    .symbols
                    .iter()
                    .map(|name| {
                        catalog
                            .id_of(name)
                            .ok_or_else(|| ConfigError::UnknownSymbol(name.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let strip_size = config
                    .strip_size
                    .unwrap_or(self.grid.rows_in(reel) as u32);
                let strip = ReelStrip::new(reel, symbols, strip_size);

                ReelSelector::new(catalog, &strip).map_err(|e| match e {
                    DrawError::EmptyCatalog => ConfigError::EmptyReel { reel },
                    DrawError::ZeroWeight => ConfigError::ZeroWeightReel { reel },
                    other => ConfigError::UnknownSymbol(other.to_string()),
                })?;
                Ok(strip)
            })
            .collect()
    }

    fn build_patterns(&self) -> Result<Vec<PaylinePattern>, ConfigError> {
        let mut patterns = if self.paylines.standard {
            standard_patterns(&self.grid)
        } else {
            Vec::new()
        };
        let offset = patterns.len();
        for (i, line) in self.paylines.lines.iter().enumerate() {
            let pattern = PaylinePattern::from_rows(&line.rows, &self.grid, line.multiplier)
                .map_err(|e| match e {
                    ConfigError::InvalidPayline { reason, .. } => ConfigError::InvalidPayline {
                        index: offset + i,
                        reason,
                    },
                    other => other,
                })?;
            patterns.push(pattern);
        }
        validate_patterns(&patterns, &self.grid)?;
        Ok(patterns)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::demo()
    }
}

fn check_symbols(symbols: &[SymbolDef]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for symbol in symbols {
        if !names.insert(symbol.name.as_str()) {
            return Err(ConfigError::DuplicateSymbol(symbol.name.clone()));
        }
        if !symbol.weight.is_finite() || symbol.weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                name: symbol.name.clone(),
                weight: symbol.weight,
            });
        }
    }
    if symbols.len() > MAX_CATALOG_SYMBOLS {
        return Err(ConfigError::LimitExceeded(format!("{} symbols", symbols.len())));
    }
    Ok(())
}

/// Parsing limits
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    pub max_name_length: usize,
    pub max_symbols: usize,
    pub max_paylines: usize,
    pub max_reels: usize,
    pub max_rows: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_name_length: 256,
            max_symbols: 64,
            max_paylines: 200,
            max_reels: 10,
            max_rows: 12,
        }
    }
}

/// Config parser
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    pub limits: ConfigLimits,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Parse a JSON machine config
    pub fn parse_json(&self, json: &str) -> Result<MachineConfig, ConfigError> {
        let config: MachineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        self.validate(&config)?;
        Ok(config)
    }

    /// Parse a YAML machine config
    pub fn parse_yaml(&self, yaml: &str) -> Result<MachineConfig, ConfigError> {
        let config: MachineConfig =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        self.validate(&config)?;
        Ok(config)
    }

    /// Load from disk; `.yaml`/`.yml` parse as YAML, everything else as JSON
    pub fn load(&self, path: impl AsRef<Path>) -> Result<MachineConfig, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        log::debug!("loading machine config from {}", path.display());
        if is_yaml {
            self.parse_yaml(&text)
        } else {
            self.parse_json(&text)
        }
    }

    /// Enforce limits, then resolve every cross reference
    pub fn validate(&self, config: &MachineConfig) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if config.name.len() > limits.max_name_length {
            return Err(ConfigError::LimitExceeded(format!(
                "name too long: {} > {}",
                config.name.len(),
                limits.max_name_length
            )));
        }
        if config.symbols.len() > limits.max_symbols {
            return Err(ConfigError::LimitExceeded(format!(
                "too many symbols: {} > {}",
                config.symbols.len(),
                limits.max_symbols
            )));
        }
        if config.grid.columns() > limits.max_reels {
            return Err(ConfigError::LimitExceeded(format!(
                "too many reels: {} > {}",
                config.grid.columns(),
                limits.max_reels
            )));
        }
        if config.grid.max_rows() > limits.max_rows {
            return Err(ConfigError::LimitExceeded(format!(
                "too many rows: {} > {}",
                config.grid.max_rows(),
                limits.max_rows
            )));
        }
        if config.paylines.lines.len() > limits.max_paylines {
            return Err(ConfigError::LimitExceeded(format!(
                "too many paylines: {} > {}",
                config.paylines.lines.len(),
                limits.max_paylines
            )));
        }
        config.build().map(|_| ())
    }
}
