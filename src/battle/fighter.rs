use serde::{Deserialize, Serialize};

use crate::battle::stats::BattleStats;
use crate::battle::tags::TagSet;
use crate::error::EngineError;
use crate::profile::normalize::CanonicalProfile;

/// Snapshot of one canonical profile used for a single comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub id: String,
    pub name: String,
    pub stats: BattleStats,
    pub tags: TagSet,
}

impl Fighter {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stats: BattleStats,
        tags: TagSet,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            tags,
        }
    }

    /// Normalizer output is canonical by construction, so this cannot fail.
    pub fn from_profile(
        id: impl Into<String>,
        name: impl Into<String>,
        profile: &CanonicalProfile,
    ) -> Self {
        Self::new(id, name, profile.stats, profile.tags)
    }

    /// Strict constructor for caller-supplied data: stats must already be canonical.
    pub fn checked(
        id: impl Into<String>,
        name: impl Into<String>,
        stats: BattleStats,
        tags: TagSet,
    ) -> Result<Self, EngineError> {
        stats.validate()?;
        Ok(Self::new(id, name, stats, tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::normalize::normalize_profile;

    #[test]
    fn normalized_profile_becomes_a_valid_fighter() {
        let raw = r#"{"battleTags":["evade"],"stats":{"hp":171,"power":140,"defense":"33"}}"#;
        let profile = normalize_profile(raw).into_complete().expect("complete");
        let fighter = Fighter::from_profile("p-1", "Pip", &profile);
        assert!(fighter.stats.validate().is_ok());
        assert_eq!(fighter.stats.hp, 170);
        assert_eq!(fighter.tags, profile.tags);
    }

    #[test]
    fn checked_rejects_out_of_range_stats() {
        let raw = r#"{"battleTags":[],"stats":{"hp":180}}"#;
        let mut stats = normalize_profile(raw).into_complete().expect("complete").stats;
        stats.magic = 101.0;
        let tags = crate::battle::tags::TagSet::try_from_strs(&["rush", "burst", "combo"])
            .expect("tags");
        assert!(Fighter::checked("x", "x", stats, tags).is_err());
    }
}
