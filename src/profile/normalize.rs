//! Profile normalizer: untrusted model text in, canonical stats + exactly three tags out.
//!
//! Nothing here returns an error. Bad numbers are coerced (clamped or defaulted), unknown
//! tags are dropped, short tag lists are padded in catalog order, and unparseable text
//! degrades to an [IncompleteProfile] carrying the raw text as analysis.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::battle::stats::{
    BattleStats, StatKey, HP_DEFAULT, HP_MAX, HP_MIN, HP_STEP, STAT_MAX, STAT_MIN,
};
use crate::battle::tags::{CanonicalTag, TagSet, TAGS_PER_PROFILE};
use crate::profile::schema::StatSchema;

const STATS_KEYS: &[&str] = &["stats", "battle_stats"];
const TAGS_KEYS: &[&str] = &["battleTags", "battle_tags"];
const ANALYSIS_KEY: &str = "analysis";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalProfile {
    pub stats: BattleStats,
    pub tags: TagSet,
    pub analysis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteReason {
    /// No JSON object could be recovered from the text.
    Unparseable,
    MissingStats,
    MissingTags,
    MissingBoth,
    /// Stats were present but in the legacy layout.
    LegacySchema,
}

impl IncompleteReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unparseable => "unparseable",
            Self::MissingStats => "missing_stats",
            Self::MissingTags => "missing_tags",
            Self::MissingBoth => "missing_both",
            Self::LegacySchema => "legacy_schema",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncompleteProfile {
    pub reason: IncompleteReason,
    pub schema: StatSchema,
    pub stats: Option<BattleStats>,
    pub tags: Option<TagSet>,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileOutcome {
    Complete(CanonicalProfile),
    Incomplete(IncompleteProfile),
}

impl ProfileOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn stats(&self) -> Option<&BattleStats> {
        match self {
            Self::Complete(profile) => Some(&profile.stats),
            Self::Incomplete(profile) => profile.stats.as_ref(),
        }
    }

    pub fn tags(&self) -> Option<&TagSet> {
        match self {
            Self::Complete(profile) => Some(&profile.tags),
            Self::Incomplete(profile) => profile.tags.as_ref(),
        }
    }

    pub fn analysis(&self) -> &str {
        match self {
            Self::Complete(profile) => &profile.analysis,
            Self::Incomplete(profile) => &profile.analysis,
        }
    }

    pub fn into_complete(self) -> Option<CanonicalProfile> {
        match self {
            Self::Complete(profile) => Some(profile),
            Self::Incomplete(_) => None,
        }
    }
}

/// Numbers and numeric strings are accepted; everything else is non-numeric.
fn read_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn quantize_hp(raw: Option<f64>) -> u32 {
    let Some(raw) = raw else {
        return HP_DEFAULT;
    };
    let step = f64::from(HP_STEP);
    let rounded = (raw / step).round() * step;
    rounded.clamp(f64::from(HP_MIN), f64::from(HP_MAX)) as u32
}

/// Coerce one raw stats object. `None` only when `raw` is not an object.
pub fn normalize_stats(raw: &Value) -> Option<BattleStats> {
    let object = raw.as_object()?;
    let bounded = |key: StatKey| {
        read_number(object.get(key.as_str()))
            .unwrap_or(STAT_MIN)
            .clamp(STAT_MIN, STAT_MAX)
    };
    Some(BattleStats {
        hp: quantize_hp(read_number(object.get("hp"))),
        power: bounded(StatKey::Power),
        defense: bounded(StatKey::Defense),
        speed: bounded(StatKey::Speed),
        physical: bounded(StatKey::Physical),
        magic: bounded(StatKey::Magic),
        range: bounded(StatKey::Range),
    })
}

/// Filter to catalog members, de-duplicate (first occurrence wins), keep the first three,
/// and pad from the catalog in canonical order when fewer than three survive.
pub fn normalize_battle_tags(raw: &[Value]) -> TagSet {
    let mut picked: Vec<CanonicalTag> = Vec::with_capacity(TAGS_PER_PROFILE);
    for tag in raw.iter().filter_map(Value::as_str).filter_map(CanonicalTag::parse) {
        if picked.len() == TAGS_PER_PROFILE {
            break;
        }
        if !picked.contains(&tag) {
            picked.push(tag);
        }
    }
    for tag in CanonicalTag::ALL {
        if picked.len() == TAGS_PER_PROFILE {
            break;
        }
        if !picked.contains(&tag) {
            picked.push(tag);
        }
    }
    TagSet::from_distinct([picked[0], picked[1], picked[2]])
}

/// Like [normalize_battle_tags] for a raw JSON value; `None` when it is not an array.
pub fn normalize_battle_tags_value(raw: &Value) -> Option<TagSet> {
    raw.as_array().map(|items| normalize_battle_tags(items))
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n').map(|index| index + 1)?;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Recover one JSON object from bare JSON, a fenced code block, or surrounding prose.
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    let trimmed = raw.trim();
    [Some(trimmed), strip_code_fence(trimmed), brace_span(trimmed)]
        .into_iter()
        .flatten()
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(object)) => Some(object),
            _ => None,
        })
}

fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

/// Ingest entry point. Never panics or errors on malformed input.
pub fn normalize_profile(raw: &str) -> ProfileOutcome {
    let Some(object) = extract_json_object(raw) else {
        log::warn!("model output is not structured JSON; keeping it as analysis text only");
        return ProfileOutcome::Incomplete(IncompleteProfile {
            reason: IncompleteReason::Unparseable,
            schema: StatSchema::Unknown,
            stats: None,
            tags: None,
            analysis: raw.to_string(),
        });
    };

    let analysis = object
        .get(ANALYSIS_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let raw_stats = first_present(&object, STATS_KEYS);
    let schema = raw_stats.map_or(StatSchema::Unknown, StatSchema::detect);
    let stats = match schema {
        StatSchema::Legacy => None,
        _ => raw_stats.and_then(normalize_stats),
    };
    let tags = first_present(&object, TAGS_KEYS).and_then(normalize_battle_tags_value);

    let reason = match (stats, tags) {
        (Some(stats), Some(tags)) => {
            return ProfileOutcome::Complete(CanonicalProfile {
                stats,
                tags,
                analysis,
            });
        }
        _ if schema == StatSchema::Legacy => IncompleteReason::LegacySchema,
        (None, Some(_)) => IncompleteReason::MissingStats,
        (Some(_), None) => IncompleteReason::MissingTags,
        (None, None) => IncompleteReason::MissingBoth,
    };

    log::warn!("model output produced an incomplete profile: {}", reason.as_str());
    ProfileOutcome::Incomplete(IncompleteProfile {
        reason,
        schema,
        stats,
        tags,
        analysis,
    })
}
