//! Tag bonus table: per-tag additive stat deltas plus an intangible `score` term.
//! Balance changes are data edits here (or in a balance file), not logic changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::stats::StatKey;
use crate::battle::tags::{CanonicalTag, TAG_COUNT};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagBonus {
    pub power: f64,
    pub defense: f64,
    pub speed: f64,
    pub physical: f64,
    pub magic: f64,
    pub range: f64,
    /// Contribution that maps to no visible stat (tempo, synergy).
    pub score: f64,
}

impl TagBonus {
    const fn stats(power: f64, defense: f64, speed: f64, range: f64, score: f64) -> Self {
        Self {
            power,
            defense,
            speed,
            physical: 0.0,
            magic: 0.0,
            range,
            score,
        }
    }

    pub fn delta(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Power => self.power,
            StatKey::Defense => self.defense,
            StatKey::Speed => self.speed,
            StatKey::Physical => self.physical,
            StatKey::Magic => self.magic,
            StatKey::Range => self.range,
        }
    }

    /// Total absolute footprint across all six deltas and the score term.
    pub fn footprint(&self) -> f64 {
        StatKey::ALL
            .iter()
            .map(|key| self.delta(*key).abs())
            .sum::<f64>()
            + self.score.abs()
    }

    fn first_non_finite(&self) -> Option<&'static str> {
        StatKey::ALL
            .iter()
            .find(|key| !self.delta(**key).is_finite())
            .map(|key| key.as_str())
            .or_else(|| (!self.score.is_finite()).then_some("score"))
    }
}

/// Total mapping from every [CanonicalTag] to its [TagBonus].
#[derive(Debug, Clone, PartialEq)]
pub struct TagBonusTable {
    entries: [TagBonus; TAG_COUNT],
}

impl TagBonusTable {
    pub fn reference() -> Self {
        use CanonicalTag as T;

        let mut entries = [TagBonus::default(); TAG_COUNT];
        let rows: [(CanonicalTag, TagBonus); TAG_COUNT] = [
            // (power, defense, speed, range, score)
            (T::Rush, TagBonus::stats(6.0, -2.0, 3.0, 0.0, 0.0)),
            (T::Burst, TagBonus::stats(8.0, -3.0, 0.0, 0.0, 1.0)),
            (T::Combo, TagBonus::stats(3.0, 0.0, 2.0, 0.0, 0.0)),
            (T::Assassinate, TagBonus::stats(7.0, -3.0, 4.0, 0.0, 0.0)),
            (T::Finisher, TagBonus::stats(3.0, 0.0, 0.0, 0.0, 2.0)),
            (T::Tank, TagBonus::stats(0.0, 8.0, -3.0, 0.0, 1.0)),
            (T::Sustain, TagBonus::stats(0.0, 6.0, 0.0, 0.0, 1.0)),
            (T::Lifesteal, TagBonus::stats(2.0, 3.0, 0.0, 0.0, 1.0)),
            (T::Evade, TagBonus::stats(0.0, 2.0, 3.0, 0.0, 0.0)),
            (T::Indomitable, TagBonus::stats(2.0, 3.0, 0.0, 0.0, 2.0)),
            (T::Harass, TagBonus::stats(0.0, 0.0, 2.0, 6.0, 1.0)),
            (T::Bind, TagBonus::stats(0.0, 0.0, -1.0, 4.0, 1.0)),
            (T::Suppress, TagBonus::stats(2.0, 2.0, 0.0, 0.0, 1.0)),
            (T::Counter, TagBonus::stats(4.0, 0.0, 0.0, 0.0, 1.0)),
            (T::Riposte, TagBonus::stats(5.0, 0.0, 2.0, 0.0, 1.0)),
            (T::FirstStrike, TagBonus::stats(0.0, 0.0, 7.0, 0.0, 1.0)),
            (T::Haste, TagBonus::stats(2.0, 0.0, 2.0, 0.0, 1.0)),
            (T::Frenzy, TagBonus::stats(4.0, 0.0, 2.0, 0.0, 1.0)),
            (T::Stealth, TagBonus::stats(3.0, 0.0, 4.0, 0.0, 1.0)),
            (T::Mobility, TagBonus::stats(0.0, 0.0, 3.0, 2.0, 0.0)),
            (T::Calculated, TagBonus::stats(0.0, 0.0, 0.0, 2.0, 2.0)),
            (T::Madness, TagBonus::stats(0.0, 0.0, 0.0, 0.0, 2.0)),
            (
                T::Focus,
                TagBonus {
                    power: 2.0,
                    physical: 2.0,
                    magic: 2.0,
                    ..TagBonus::default()
                },
            ),
            (T::Spread, TagBonus::stats(0.0, 2.0, 0.0, 2.0, -1.0)),
        ];
        for (tag, bonus) in rows {
            entries[tag.index()] = bonus;
        }
        Self { entries }
    }

    /// Build from a name-keyed map; every catalog tag must appear exactly once.
    pub fn from_entries(map: &BTreeMap<String, TagBonus>) -> Result<Self, ConfigError> {
        let mut entries = [TagBonus::default(); TAG_COUNT];
        let mut filled = [false; TAG_COUNT];

        for (name, bonus) in map {
            let tag = CanonicalTag::parse(name)
                .ok_or_else(|| ConfigError::UnknownTagBonus(name.clone()))?;
            if let Some(field) = bonus.first_non_finite() {
                return Err(ConfigError::InvalidTagBonus {
                    tag: name.clone(),
                    field,
                });
            }
            entries[tag.index()] = *bonus;
            filled[tag.index()] = true;
        }

        if let Some(missing) = CanonicalTag::ALL.iter().find(|tag| !filled[tag.index()]) {
            return Err(ConfigError::MissingTagBonus(missing.as_str().to_string()));
        }

        Ok(Self { entries })
    }

    pub fn get(&self, tag: CanonicalTag) -> &TagBonus {
        &self.entries[tag.index()]
    }

    /// Catalog-ordered `(tag, bonus)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalTag, &TagBonus)> + '_ {
        CanonicalTag::ALL
            .iter()
            .map(move |tag| (*tag, &self.entries[tag.index()]))
    }

    pub fn to_entries(&self) -> BTreeMap<String, TagBonus> {
        self.iter()
            .map(|(tag, bonus)| (tag.as_str().to_string(), *bonus))
            .collect()
    }
}

impl Default for TagBonusTable {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_spot_values() {
        let table = TagBonusTable::reference();
        let rush = table.get(CanonicalTag::Rush);
        assert_eq!((rush.power, rush.speed, rush.defense, rush.score), (6.0, 3.0, -2.0, 0.0));
        let focus = table.get(CanonicalTag::Focus);
        assert_eq!((focus.power, focus.physical, focus.magic), (2.0, 2.0, 2.0));
        assert_eq!(table.get(CanonicalTag::Spread).score, -1.0);
        assert_eq!(table.get(CanonicalTag::Madness).footprint(), 2.0);
    }

    #[test]
    fn footprint_sums_absolute_values() {
        let burst = TagBonusTable::reference().get(CanonicalTag::Burst).footprint();
        assert_eq!(burst, 8.0 + 3.0 + 1.0);
    }

    #[test]
    fn from_entries_round_trips_reference() {
        let reference = TagBonusTable::reference();
        let rebuilt = TagBonusTable::from_entries(&reference.to_entries()).expect("total table");
        assert_eq!(rebuilt, reference);
    }

    #[test]
    fn from_entries_reports_missing_and_unknown_tags() {
        let mut entries = TagBonusTable::reference().to_entries();
        entries.remove("spread");
        assert_eq!(
            TagBonusTable::from_entries(&entries),
            Err(ConfigError::MissingTagBonus("spread".to_string()))
        );

        let mut entries = TagBonusTable::reference().to_entries();
        entries.insert("teleport".to_string(), TagBonus::default());
        assert_eq!(
            TagBonusTable::from_entries(&entries),
            Err(ConfigError::UnknownTagBonus("teleport".to_string()))
        );
    }
}
