//! Balance configuration: weights, tag bonuses and damping, passed explicitly to every
//! scoring call so alternate configurations can run side by side.
//!
//! File format (YAML or JSON, chosen by extension):
//!
//! ```yaml
//! damping: 18
//! weights: { hp: 1.0, power: 1.0, defense: 0.95, speed: 1.05, physical: 0.9, magic: 0.9, range: 0.9 }
//! tag_bonuses:
//!   rush: { power: 6, speed: 3, defense: -2 }
//!   # ... one entry per canonical tag
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::bonus::{TagBonus, TagBonusTable};
use crate::battle::scoring::WeightTable;
use crate::error::ConfigError;

pub const DEFAULT_DAMPING: f64 = 18.0;
pub const BALANCE_ENV_VAR: &str = "DUELIST_BALANCE";
pub const REFERENCE_BALANCE_PATH: &str = "data/balance.reference.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    weights: WeightTable,
    bonuses: TagBonusTable,
    damping: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BalanceFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_bonuses: Option<BTreeMap<String, TagBonus>>,
}

impl Balance {
    pub fn new(
        weights: WeightTable,
        bonuses: TagBonusTable,
        damping: f64,
    ) -> Result<Self, ConfigError> {
        weights.validate()?;
        validate_damping(damping)?;
        Ok(Self {
            weights,
            bonuses,
            damping,
        })
    }

    pub fn reference() -> Self {
        Self {
            weights: WeightTable::REFERENCE,
            bonuses: TagBonusTable::reference(),
            damping: DEFAULT_DAMPING,
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn bonuses(&self) -> &TagBonusTable {
        &self.bonuses
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn from_file_repr(file: BalanceFile) -> Result<Self, ConfigError> {
        let bonuses = match file.tag_bonuses {
            Some(entries) => TagBonusTable::from_entries(&entries)?,
            None => TagBonusTable::reference(),
        };
        Self::new(
            file.weights.unwrap_or(WeightTable::REFERENCE),
            bonuses,
            file.damping.unwrap_or(DEFAULT_DAMPING),
        )
    }

    pub fn to_file_repr(&self) -> BalanceFile {
        BalanceFile {
            damping: Some(self.damping),
            weights: Some(self.weights),
            tag_bonuses: Some(self.bonuses.to_entries()),
        }
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::reference()
    }
}

fn validate_damping(damping: f64) -> Result<(), ConfigError> {
    if damping.is_finite() && damping > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDamping(damping))
    }
}

/// Load a balance file. `.yaml`/`.yml` parse as YAML, anything else as JSON.
pub fn load_balance(path: &str) -> Result<Balance, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
        path: path.to_string(),
        message: err.to_string(),
    })?;
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let file: BalanceFile = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_string(),
            message: err.to_string(),
        })?
    } else {
        serde_json::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_string(),
            message: err.to_string(),
        })?
    };

    let balance = Balance::from_file_repr(file)?;
    log::debug!("loaded balance from '{path}' (damping {})", balance.damping());
    Ok(balance)
}

/// Resolve the process balance from `DUELIST_BALANCE`, falling back to the reference values.
/// A set-but-broken path is an error rather than a silent fallback.
pub fn balance_from_env() -> Result<Balance, ConfigError> {
    balance_from_setting(std::env::var(BALANCE_ENV_VAR).ok().as_deref())
}

fn balance_from_setting(setting: Option<&str>) -> Result<Balance, ConfigError> {
    match setting.map(str::trim) {
        Some(path) if !path.is_empty() => load_balance(path),
        _ => Ok(Balance::reference()),
    }
}
