//! Canonical stat block. Keys match the current (v2) profile schema:
//! hp, power, defense, speed, physical, magic, range.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const HP_MIN: u32 = 160;
pub const HP_MAX: u32 = 200;
pub const HP_STEP: u32 = 10;
pub const HP_DEFAULT: u32 = 180;

pub const STAT_MIN: f64 = 0.0;
/// Upper bound for normalized (pre-bonus) stats.
pub const STAT_MAX: f64 = 100.0;
/// Upper bound after tag bonuses are applied.
pub const BONUS_STAT_MAX: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub hp: u32,
    pub power: f64,
    pub defense: f64,
    pub speed: f64,
    pub physical: f64,
    pub magic: f64,
    pub range: f64,
}

/// The six bounded, individually comparable dimensions (hp excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Power,
    Defense,
    Speed,
    Physical,
    Magic,
    Range,
}

impl StatKey {
    pub const ALL: [StatKey; 6] = [
        Self::Power,
        Self::Defense,
        Self::Speed,
        Self::Physical,
        Self::Magic,
        Self::Range,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Defense => "defense",
            Self::Speed => "speed",
            Self::Physical => "physical",
            Self::Magic => "magic",
            Self::Range => "range",
        }
    }

    /// Display label used in highlight text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Power => "Power",
            Self::Defense => "Defense",
            Self::Speed => "Speed",
            Self::Physical => "Physical offense",
            Self::Magic => "Magic offense",
            Self::Range => "Range",
        }
    }
}

impl BattleStats {
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

    pub fn get_mut(&mut self, key: StatKey) -> &mut f64 {
        match key {
            StatKey::Power => &mut self.power,
            StatKey::Defense => &mut self.defense,
            StatKey::Speed => &mut self.speed,
            StatKey::Physical => &mut self.physical,
            StatKey::Magic => &mut self.magic,
            StatKey::Range => &mut self.range,
        }
    }

    /// Strict check used for stored or caller-supplied stats (no coercion).
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(HP_MIN..=HP_MAX).contains(&self.hp) || self.hp % HP_STEP != 0 {
            return Err(EngineError::InvalidStats(format!(
                "hp {} is not a multiple of {HP_STEP} in [{HP_MIN}, {HP_MAX}]",
                self.hp
            )));
        }
        for key in StatKey::ALL {
            let value = self.get(key);
            if !value.is_finite() || !(STAT_MIN..=STAT_MAX).contains(&value) {
                return Err(EngineError::InvalidStats(format!(
                    "{} {value} is outside [{STAT_MIN}, {STAT_MAX}]",
                    key.as_str()
                )));
            }
        }
        Ok(())
    }
}

/// Rescale hp from [160, 200] onto [0, 100] so every scored term is commensurable.
pub fn hp_to_unit_scale(hp: u32) -> f64 {
    (f64::from(hp) - f64::from(HP_MIN)) / f64::from(HP_MAX - HP_MIN) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BattleStats {
        BattleStats {
            hp: 180,
            power: 50.0,
            defense: 40.0,
            speed: 60.0,
            physical: 30.0,
            magic: 20.0,
            range: 10.0,
        }
    }

    #[test]
    fn hp_rescale_maps_domain_onto_unit_range() {
        assert_eq!(hp_to_unit_scale(160), 0.0);
        assert_eq!(hp_to_unit_scale(180), 50.0);
        assert_eq!(hp_to_unit_scale(200), 100.0);
    }

    #[test]
    fn validate_accepts_canonical_and_rejects_out_of_range() {
        assert!(sample().validate().is_ok());
        assert!(BattleStats { hp: 175, ..sample() }.validate().is_err());
        assert!(BattleStats { hp: 210, ..sample() }.validate().is_err());
        assert!(BattleStats { magic: 100.5, ..sample() }.validate().is_err());
        assert!(BattleStats { speed: -1.0, ..sample() }.validate().is_err());
    }

    #[test]
    fn get_mut_writes_through() {
        let mut stats = sample();
        *stats.get_mut(StatKey::Range) += 5.0;
        assert_eq!(stats.get(StatKey::Range), 15.0);
    }

    #[test]
    fn extra_stored_keys_are_ignored() {
        let raw = r#"{"hp":180,"power":1,"defense":1,"speed":1,"physical":1,"magic":1,"range":1,"notes":"x"}"#;
        let stats = serde_json::from_str::<BattleStats>(raw).expect("extra keys tolerated");
        assert_eq!(stats.hp, 180);
    }

    #[test]
    fn missing_field_fails_strict_deserialize() {
        let raw = r#"{"hp":180,"power":1,"defense":1,"speed":1,"physical":1,"magic":1}"#;
        assert!(serde_json::from_str::<BattleStats>(raw).is_err());
    }
}
