//! Stat schema detection. Two stat layouts have been produced over time; only `Current`
//! feeds the engine. Legacy blobs are reported, not remapped.

use serde::Serialize;
use serde_json::Value;

/// Version stamp persisted alongside profiles produced by the current normalizer.
pub const CURRENT_STATS_VERSION: i64 = 2;

const CURRENT_ONLY_KEYS: &[&str] = &["hp", "defense", "physical", "magic", "range"];
const LEGACY_ONLY_KEYS: &[&str] = &["toughness", "control", "burst", "sustain"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSchema {
    /// power / toughness / speed / control / burst / sustain
    Legacy,
    /// hp / power / defense / speed / physical / magic / range
    Current,
    Unknown,
}

impl StatSchema {
    pub fn detect(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unknown;
        };
        if CURRENT_ONLY_KEYS.iter().any(|key| object.contains_key(*key)) {
            Self::Current
        } else if LEGACY_ONLY_KEYS.iter().any(|key| object.contains_key(*key)) {
            Self::Legacy
        } else {
            Self::Unknown
        }
    }
}
