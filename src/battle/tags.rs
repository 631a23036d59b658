//! Canonical combat-trait catalog. Membership in [CanonicalTag::ALL] is the only validity test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const TAG_COUNT: usize = 24;
pub const TAGS_PER_PROFILE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalTag {
    Rush,
    Burst,
    Combo,
    Assassinate,
    Finisher,
    Tank,
    Sustain,
    Lifesteal,
    Evade,
    Indomitable,
    Harass,
    Bind,
    Suppress,
    Counter,
    Riposte,
    FirstStrike,
    Haste,
    Frenzy,
    Stealth,
    Mobility,
    Calculated,
    Madness,
    Focus,
    Spread,
}

impl CanonicalTag {
    /// Catalog in canonical order. Padding walks this order.
    pub const ALL: [CanonicalTag; TAG_COUNT] = [
        Self::Rush,
        Self::Burst,
        Self::Combo,
        Self::Assassinate,
        Self::Finisher,
        Self::Tank,
        Self::Sustain,
        Self::Lifesteal,
        Self::Evade,
        Self::Indomitable,
        Self::Harass,
        Self::Bind,
        Self::Suppress,
        Self::Counter,
        Self::Riposte,
        Self::FirstStrike,
        Self::Haste,
        Self::Frenzy,
        Self::Stealth,
        Self::Mobility,
        Self::Calculated,
        Self::Madness,
        Self::Focus,
        Self::Spread,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rush => "rush",
            Self::Burst => "burst",
            Self::Combo => "combo",
            Self::Assassinate => "assassinate",
            Self::Finisher => "finisher",
            Self::Tank => "tank",
            Self::Sustain => "sustain",
            Self::Lifesteal => "lifesteal",
            Self::Evade => "evade",
            Self::Indomitable => "indomitable",
            Self::Harass => "harass",
            Self::Bind => "bind",
            Self::Suppress => "suppress",
            Self::Counter => "counter",
            Self::Riposte => "riposte",
            Self::FirstStrike => "first_strike",
            Self::Haste => "haste",
            Self::Frenzy => "frenzy",
            Self::Stealth => "stealth",
            Self::Mobility => "mobility",
            Self::Calculated => "calculated",
            Self::Madness => "madness",
            Self::Focus => "focus",
            Self::Spread => "spread",
        }
    }

    /// Position in the canonical catalog; also the row index into bonus tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exact catalog lookup after trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL.iter().copied().find(|tag| tag.as_str() == trimmed)
    }

    pub fn is_canonical(raw: &str) -> bool {
        Self::parse(raw).is_some()
    }
}

impl fmt::Display for CanonicalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalTag {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| EngineError::UnknownTag(s.to_string()))
    }
}

/// Exactly three distinct canonical tags, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet([CanonicalTag; TAGS_PER_PROFILE]);

impl TagSet {
    pub fn new(tags: [CanonicalTag; TAGS_PER_PROFILE]) -> Result<Self, EngineError> {
        let [a, b, c] = tags;
        if a == b || a == c || b == c {
            return Err(EngineError::InvalidTagSet(format!(
                "duplicate tag in [{a}, {b}, {c}]"
            )));
        }
        Ok(Self(tags))
    }

    /// Caller guarantees the three tags are distinct.
    pub(crate) fn from_distinct(tags: [CanonicalTag; TAGS_PER_PROFILE]) -> Self {
        debug_assert!(tags[0] != tags[1] && tags[0] != tags[2] && tags[1] != tags[2]);
        Self(tags)
    }

    /// Strict conversion for already-canonical data (stored records, API bodies).
    pub fn try_from_strs<S: AsRef<str>>(raw: &[S]) -> Result<Self, EngineError> {
        if raw.len() != TAGS_PER_PROFILE {
            return Err(EngineError::InvalidTagSet(format!(
                "expected {TAGS_PER_PROFILE} tags, got {}",
                raw.len()
            )));
        }
        let mut tags = [CanonicalTag::Rush; TAGS_PER_PROFILE];
        for (slot, value) in tags.iter_mut().zip(raw) {
            *slot = CanonicalTag::parse(value.as_ref()).ok_or_else(|| {
                EngineError::InvalidTagSet(format!("'{}' is not a canonical tag", value.as_ref()))
            })?;
        }
        Self::new(tags)
    }

    pub fn as_slice(&self) -> &[CanonicalTag] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = CanonicalTag> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, tag: CanonicalTag) -> bool {
        self.0.contains(&tag)
    }
}

impl TryFrom<Vec<String>> for TagSet {
    type Error = EngineError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::try_from_strs(&value)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(value: TagSet) -> Self {
        value.iter().map(|tag| tag.as_str().to_string()).collect()
    }
}
