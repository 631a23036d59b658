//! Persisted profile shape as stored by the external profile store, and the strict
//! conversion from a stored record to a [Fighter].

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::battle::fighter::Fighter;
use crate::battle::stats::BattleStats;
use crate::battle::tags::TagSet;
use crate::error::EngineError;
use crate::profile::normalize::CanonicalProfile;
use crate::profile::schema::StatSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub battle_tags: Option<Vec<String>>,
    #[serde(default)]
    pub battle_stats: Option<Value>,
    /// Opaque to the engine; stamped by whoever persists the record.
    #[serde(default)]
    pub battle_stats_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_stats_updated_at: Option<String>,
}

/// One stored profile as it appears in a roster export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub record: ProfileRecord,
}

impl RosterEntry {
    pub fn to_fighter(&self) -> Result<Fighter, EngineError> {
        self.record.to_fighter(&self.id, &self.name)
    }
}

impl ProfileRecord {
    /// Fails when the stats are off the canonical grid, so a record is never stored in a
    /// shape [ProfileRecord::to_fighter] would reject.
    pub fn from_profile(profile: &CanonicalProfile, version: i64) -> Result<Self, EngineError> {
        profile.stats.validate()?;
        let stats = serde_json::to_value(profile.stats)
            .map_err(|err| EngineError::InvalidStats(format!("stats not serializable: {err}")))?;
        Ok(Self {
            battle_tags: Some(profile.tags.into()),
            battle_stats: Some(stats),
            battle_stats_version: Some(version),
            battle_stats_updated_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        })
    }

    /// Strict conversion. Stored data is expected to be canonical already; anything else
    /// is a contract violation reported to the caller.
    pub fn to_fighter(&self, id: &str, name: &str) -> Result<Fighter, EngineError> {
        let missing = |missing: &'static str| EngineError::IncompleteProfile {
            id: id.to_string(),
            missing,
        };
        let (raw_stats, raw_tags) = match (&self.battle_stats, &self.battle_tags) {
            (Some(stats), Some(tags)) => (stats, tags),
            (None, None) => return Err(missing("battle_stats and battle_tags")),
            (None, Some(_)) => return Err(missing("battle_stats")),
            (Some(_), None) => return Err(missing("battle_tags")),
        };

        if StatSchema::detect(raw_stats) == StatSchema::Legacy {
            return Err(EngineError::InvalidStats(format!(
                "profile '{id}' stores legacy-schema stats"
            )));
        }
        let stats: BattleStats = serde_json::from_value(raw_stats.clone())
            .map_err(|err| EngineError::InvalidStats(format!("profile '{id}': {err}")))?;
        let tags = TagSet::try_from_strs(raw_tags)?;

        Fighter::checked(id, name, stats, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tags::CanonicalTag;
    use serde_json::json;

    fn canonical() -> CanonicalProfile {
        CanonicalProfile {
            stats: BattleStats {
                hp: 170,
                power: 55.0,
                defense: 45.0,
                speed: 65.0,
                physical: 50.0,
                magic: 15.0,
                range: 30.0,
            },
            tags: TagSet::new([CanonicalTag::Stealth, CanonicalTag::Assassinate, CanonicalTag::Evade])
                .expect("distinct"),
            analysis: "Strikes from the shadows.".to_string(),
        }
    }

    #[test]
    fn record_from_profile_converts_back_to_fighter() {
        let record = ProfileRecord::from_profile(&canonical(), 2).expect("serializable stats");
        assert_eq!(record.battle_stats_version, Some(2));
        assert_eq!(record.battle_stats.as_ref().and_then(|s| s.get("hp")), Some(&json!(170)));
        assert!(record.battle_stats_updated_at.is_some());
        let fighter = record.to_fighter("c-1", "Shade").expect("complete record");
        assert_eq!(fighter.stats, canonical().stats);
        assert_eq!(fighter.tags, canonical().tags);
        assert_eq!(fighter.name, "Shade");
    }

    #[test]
    fn off_grid_profile_is_not_persisted() {
        let mut profile = canonical();
        profile.stats.magic = f64::NAN;
        assert!(matches!(
            ProfileRecord::from_profile(&profile, 2),
            Err(EngineError::InvalidStats(_))
        ));
    }

    #[test]
    fn missing_parts_fail_loudly() {
        let record = ProfileRecord {
            battle_tags: Some(vec!["rush".into(), "burst".into(), "combo".into()]),
            ..ProfileRecord::default()
        };
        assert_eq!(
            record.to_fighter("c-2", "x"),
            Err(EngineError::IncompleteProfile {
                id: "c-2".into(),
                missing: "battle_stats"
            })
        );
    }

    #[test]
    fn non_canonical_stored_data_is_rejected() {
        let stats = json!({"hp":180,"power":50,"defense":50,"speed":50,"physical":50,"magic":50,"range":50});
        let two_tags = ProfileRecord {
            battle_tags: Some(vec!["rush".into(), "burst".into()]),
            battle_stats: Some(stats),
            ..ProfileRecord::default()
        };
        assert!(matches!(two_tags.to_fighter("c", "x"), Err(EngineError::InvalidTagSet(_))));

        let out_of_range = ProfileRecord {
            battle_tags: Some(vec!["rush".into(), "burst".into(), "combo".into()]),
            battle_stats: Some(json!({"hp":185,"power":50,"defense":50,"speed":50,"physical":50,"magic":50,"range":50})),
            ..ProfileRecord::default()
        };
        assert!(matches!(out_of_range.to_fighter("c", "x"), Err(EngineError::InvalidStats(_))));

        let legacy = ProfileRecord {
            battle_tags: Some(vec!["rush".into(), "burst".into(), "combo".into()]),
            battle_stats: Some(json!({"power":50,"toughness":50,"speed":50,"control":50,"burst":50,"sustain":50})),
            ..ProfileRecord::default()
        };
        assert!(matches!(legacy.to_fighter("c", "x"), Err(EngineError::InvalidStats(_))));
    }

    #[test]
    fn roster_entry_reads_flat_export_shape() {
        let entry: RosterEntry = serde_json::from_value(json!({
            "id": "c-9",
            "name": "Bram",
            "battle_tags": ["tank", "indomitable", "counter"],
            "battle_stats": {"hp":200,"power":40,"defense":85,"speed":20,"physical":60,"magic":5,"range":10},
            "battle_stats_version": 2
        }))
        .expect("entry");
        let fighter = entry.to_fighter().expect("complete");
        assert_eq!(fighter.id, "c-9");
        assert!(fighter.tags.contains(CanonicalTag::Indomitable));
    }
}
