use serde::{Deserialize, Serialize};

use crate::battle::stats::{hp_to_unit_scale, BattleStats, StatKey};
use crate::error::ConfigError;

/// One coefficient per stat field. Callers may retune without touching the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightTable {
    pub hp: f64,
    pub power: f64,
    pub defense: f64,
    pub speed: f64,
    pub physical: f64,
    pub magic: f64,
    pub range: f64,
}

impl WeightTable {
    pub const REFERENCE: WeightTable = WeightTable {
        hp: 1.0,
        power: 1.0,
        defense: 0.95,
        speed: 1.05,
        physical: 0.9,
        magic: 0.9,
        range: 0.9,
    };

    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Power => self.power,
            StatKey::Defense => self.defense,
            StatKey::Speed => self.speed,
            StatKey::Physical => self.physical,
            StatKey::Magic => self.magic,
            StatKey::Range => self.range,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.hp.is_finite() {
            return Err(ConfigError::InvalidWeight {
                field: "hp",
                value: self.hp,
            });
        }
        for key in StatKey::ALL {
            let value = self.get(key);
            if !value.is_finite() {
                return Err(ConfigError::InvalidWeight {
                    field: key.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Weighted linear combination of all seven fields; hp is rescaled onto [0, 100] first.
pub fn score(stats: &BattleStats, weights: &WeightTable) -> f64 {
    hp_to_unit_scale(stats.hp) * weights.hp
        + StatKey::ALL
            .iter()
            .map(|key| stats.get(*key) * weights.get(*key))
            .sum::<f64>()
}
