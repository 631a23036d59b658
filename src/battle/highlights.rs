//! Ranked, human-readable explanation of a comparison from side A's point of view.
//!
//! Candidates come from three sources: per-stat weighted differences of the raw stats,
//! the net intangible tag score, and A's single highest-footprint "core" tag. They are
//! ranked by absolute score (stable, so ties keep source order) and cut to `max`.

use serde::Serialize;

use crate::battle::balance::Balance;
use crate::battle::bonus::TagBonusTable;
use crate::battle::fighter::Fighter;
use crate::battle::stats::StatKey;
use crate::battle::tags::{CanonicalTag, TagSet};

pub const DEFAULT_MAX_HIGHLIGHTS: usize = 3;

/// Ranking key of the core-tag highlight; constant, not proportional to magnitude.
pub const CORE_TAG_RANK: f64 = 2.0;

pub const FALLBACK_HIGHLIGHTS: [&str; 3] = [
    "A close match between similar stats and styles.",
    "Small differences piled up until one side pulled ahead.",
    "Keeping the opponent's strengths in check proved decisive.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "subject", rename_all = "snake_case")]
pub enum HighlightKey {
    Stat(StatKey),
    TagSynergy,
    CoreTag(CanonicalTag),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub key: HighlightKey,
    /// Positive favors A, negative favors B. Ranking uses the absolute value.
    pub score: f64,
    pub text: String,
}

fn stat_highlights(a: &Fighter, b: &Fighter, balance: &Balance) -> Vec<Highlight> {
    let weights = balance.weights();
    StatKey::ALL
        .iter()
        .filter_map(|key| {
            let diff = (a.stats.get(*key) - b.stats.get(*key)) * weights.get(*key);
            if diff == 0.0 {
                return None;
            }
            let text = if diff > 0.0 {
                format!("{} advantage seized the initiative. (+{:.1})", key.label(), diff.abs())
            } else {
                format!(
                    "Made up for a {} deficit with other strengths. (-{:.1})",
                    key.label().to_lowercase(),
                    diff.abs()
                )
            };
            Some(Highlight {
                key: HighlightKey::Stat(*key),
                score: diff,
                text,
            })
        })
        .collect()
}

fn tag_score_total(tags: &TagSet, bonuses: &TagBonusTable) -> f64 {
    tags.iter().map(|tag| bonuses.get(tag).score).sum()
}

fn synergy_highlight(a: &Fighter, b: &Fighter, bonuses: &TagBonusTable) -> Option<Highlight> {
    let diff = tag_score_total(&a.tags, bonuses) - tag_score_total(&b.tags, bonuses);
    if diff == 0.0 {
        return None;
    }
    let text = if diff > 0.0 {
        format!("Came out ahead on combat-style (tag) synergy. (+{:.1})", diff)
    } else {
        format!(
            "Overcame an unfavorable combat-style (tag) matchup through execution. (-{:.1})",
            diff.abs()
        )
    };
    Some(Highlight {
        key: HighlightKey::TagSynergy,
        score: diff,
        text,
    })
}

/// A's tag with the largest total absolute footprint; the first one wins ties.
pub fn core_tag(tags: &TagSet, bonuses: &TagBonusTable) -> Option<CanonicalTag> {
    let mut best: Option<(CanonicalTag, f64)> = None;
    for tag in tags.iter() {
        let footprint = bonuses.get(tag).footprint();
        if best.map_or(true, |(_, top)| footprint > top) {
            best = Some((tag, footprint));
        }
    }
    best.map(|(tag, _)| tag)
}

/// Ranked highlight candidates, cut to `max`. Empty when nothing separates the two sides;
/// the core-tag line only accompanies an actual stat or synergy difference.
pub fn rank_highlights(a: &Fighter, b: &Fighter, balance: &Balance, max: usize) -> Vec<Highlight> {
    let bonuses = balance.bonuses();
    let mut points = stat_highlights(a, b, balance);
    points.extend(synergy_highlight(a, b, bonuses));
    if points.is_empty() {
        return Vec::new();
    }

    if let Some(tag) = core_tag(&a.tags, bonuses) {
        points.push(Highlight {
            key: HighlightKey::CoreTag(tag),
            score: CORE_TAG_RANK,
            text: format!("The battle plan came together around the core tag '{tag}'."),
        });
    }

    points.sort_by(|left, right| right.score.abs().total_cmp(&left.score.abs()));
    points.truncate(max);
    points
}

/// Highlight strings for A vs B. Never empty for `max >= 1`: with no separating factor
/// the generic close-match lines are returned instead.
///
/// The fallback list holds three lines, so a mirror match yields at most three entries
/// even when `max` is larger.
pub fn build_highlights(a: &Fighter, b: &Fighter, balance: &Balance, max: usize) -> Vec<String> {
    let ranked = rank_highlights(a, b, balance, max);
    if ranked.is_empty() {
        return FALLBACK_HIGHLIGHTS
            .iter()
            .take(max)
            .map(|line| line.to_string())
            .collect();
    }
    ranked.into_iter().map(|point| point.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::stats::BattleStats;

    fn fighter(id: &str, power: f64, tags: [CanonicalTag; 3]) -> Fighter {
        Fighter::new(
            id,
            id.to_uppercase(),
            BattleStats {
                hp: 190,
                power,
                defense: 40.0,
                speed: 55.0,
                physical: 35.0,
                magic: 25.0,
                range: 45.0,
            },
            TagSet::new(tags).expect("distinct tags"),
        )
    }

    #[test]
    fn core_tag_prefers_largest_footprint_then_first() {
        let bonuses = TagBonusTable::reference();
        let set = TagSet::new([CanonicalTag::Combo, CanonicalTag::Assassinate, CanonicalTag::Burst])
            .expect("distinct");
        // assassinate 14 vs burst 12 vs combo 5
        assert_eq!(core_tag(&set, &bonuses), Some(CanonicalTag::Assassinate));

        let ordered = TagSet::new([CanonicalTag::Counter, CanonicalTag::Calculated, CanonicalTag::Madness])
            .expect("distinct");
        // counter 5, calculated 4, madness 2
        assert_eq!(core_tag(&ordered, &bonuses), Some(CanonicalTag::Counter));

        let equal = TagSet::new([CanonicalTag::Evade, CanonicalTag::Combo, CanonicalTag::Mobility])
            .expect("distinct");
        assert_eq!(core_tag(&equal, &bonuses), Some(CanonicalTag::Evade));
    }

    #[test]
    fn ranking_orders_by_absolute_score() {
        let tags = [CanonicalTag::Rush, CanonicalTag::Burst, CanonicalTag::Assassinate];
        let a = fighter("a", 80.0, tags);
        let mut b = fighter("b", 50.0, tags);
        b.stats.speed = 45.0;
        let ranked = rank_highlights(&a, &b, &Balance::reference(), 5);
        let keys: Vec<HighlightKey> = ranked.iter().map(|point| point.key).collect();
        assert_eq!(
            keys,
            vec![
                HighlightKey::Stat(StatKey::Power),
                HighlightKey::Stat(StatKey::Speed),
                HighlightKey::CoreTag(CanonicalTag::Assassinate),
            ]
        );
        assert!(ranked[0].text.starts_with("Power advantage"));
        assert!(ranked[0].text.ends_with("(+30.0)"));
    }

    #[test]
    fn deficit_text_is_reported_for_b_advantage() {
        let tags = [CanonicalTag::Tank, CanonicalTag::Sustain, CanonicalTag::Bind];
        let a = fighter("a", 30.0, tags);
        let b = fighter("b", 70.0, tags);
        let lines = build_highlights(&a, &b, &Balance::reference(), 1);
        assert_eq!(lines, vec!["Made up for a power deficit with other strengths. (-40.0)".to_string()]);
    }

    #[test]
    fn synergy_line_appears_when_tag_scores_differ() {
        let a = fighter("a", 50.0, [CanonicalTag::Madness, CanonicalTag::Finisher, CanonicalTag::Calculated]);
        let b = fighter("b", 50.0, [CanonicalTag::Rush, CanonicalTag::Combo, CanonicalTag::Evade]);
        let ranked = rank_highlights(&a, &b, &Balance::reference(), 3);
        assert_eq!(ranked[0].key, HighlightKey::TagSynergy);
        assert_eq!(ranked[0].score, 6.0);
        assert!(ranked.iter().any(|p| matches!(p.key, HighlightKey::CoreTag(_))));
    }

    #[test]
    fn mirror_match_falls_back_to_generic_lines() {
        let tags = [CanonicalTag::Rush, CanonicalTag::Burst, CanonicalTag::Combo];
        let a = fighter("a", 50.0, tags);
        let lines = build_highlights(&a, &a.clone(), &Balance::reference(), 3);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], FALLBACK_HIGHLIGHTS[0]);
        assert_eq!(build_highlights(&a, &a, &Balance::reference(), 2).len(), 2);
    }

    #[test]
    fn zero_max_yields_nothing() {
        let tags = [CanonicalTag::Rush, CanonicalTag::Burst, CanonicalTag::Combo];
        let a = fighter("a", 80.0, tags);
        let b = fighter("b", 20.0, tags);
        assert!(build_highlights(&a, &b, &Balance::reference(), 0).is_empty());
        assert!(build_highlights(&a, &a, &Balance::reference(), 0).is_empty());
    }
}
