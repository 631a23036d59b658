//! Deterministic winrate: tag bonuses are summed onto raw stats, both sides are scored,
//! and the score delta goes through a damped logistic.

use serde::Serialize;

use crate::battle::balance::Balance;
use crate::battle::bonus::TagBonusTable;
use crate::battle::fighter::Fighter;
use crate::battle::scoring::{score, WeightTable};
use crate::battle::stats::{BattleStats, StatKey, BONUS_STAT_MAX, STAT_MIN};
use crate::battle::tags::TagSet;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base_a: f64,
    pub base_b: f64,
    pub tag_a: f64,
    pub tag_b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WinrateResult {
    pub p_a: f64,
    pub p_b: f64,
    pub score_a: f64,
    pub score_b: f64,
    /// `score_a - score_b`
    pub delta: f64,
    pub breakdown: ScoreBreakdown,
}

/// Bonus-adjusted stats plus the accumulated intangible score from the tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusApplied {
    pub stats: BattleStats,
    pub tag_score: f64,
}

/// Sum every tag's deltas first, then clamp once to [0, 120]. Tag order cannot matter.
/// hp is not touched by tag bonuses.
pub fn apply_tag_bonus(base: &BattleStats, tags: &TagSet, bonuses: &TagBonusTable) -> BonusApplied {
    let mut stats = *base;
    for key in StatKey::ALL {
        let total: f64 = tags.iter().map(|tag| bonuses.get(tag).delta(key)).sum();
        let slot = stats.get_mut(key);
        *slot = (*slot + total).clamp(STAT_MIN, BONUS_STAT_MAX);
    }
    let tag_score = tags.iter().map(|tag| bonuses.get(tag).score).sum();
    BonusApplied { stats, tag_score }
}

/// Post-bonus score: weighted score of the adjusted stats plus the tag score.
pub fn post_bonus_score(fighter: &Fighter, weights: &WeightTable, bonuses: &TagBonusTable) -> f64 {
    let applied = apply_tag_bonus(&fighter.stats, &fighter.tags, bonuses);
    score(&applied.stats, weights) + applied.tag_score
}

pub fn logistic(delta: f64, k: f64) -> f64 {
    1.0 / (1.0 + (-delta / k).exp())
}

/// Winrate using the balance's own damping constant.
pub fn calc_winrate(a: &Fighter, b: &Fighter, balance: &Balance) -> WinrateResult {
    winrate_unchecked(a, b, balance, balance.damping())
}

/// Winrate with an explicit damping override. `k` must be strictly positive.
pub fn calc_winrate_with_damping(
    a: &Fighter,
    b: &Fighter,
    balance: &Balance,
    k: f64,
) -> Result<WinrateResult, EngineError> {
    if !(k.is_finite() && k > 0.0) {
        return Err(EngineError::NonPositiveDamping(k));
    }
    Ok(winrate_unchecked(a, b, balance, k))
}

fn winrate_unchecked(a: &Fighter, b: &Fighter, balance: &Balance, k: f64) -> WinrateResult {
    let weights = balance.weights();
    let bonuses = balance.bonuses();

    let base_a = score(&a.stats, weights);
    let base_b = score(&b.stats, weights);

    let score_a = post_bonus_score(a, weights, bonuses);
    let score_b = post_bonus_score(b, weights, bonuses);

    let delta = score_a - score_b;
    let p_a = if delta == 0.0 { 0.5 } else { logistic(delta, k) };
    let p_b = 1.0 - p_a;

    log::debug!(
        "winrate {} vs {}: score {score_a:.3} vs {score_b:.3}, delta {delta:.3}, k {k}, p_a {p_a:.4}",
        a.id,
        b.id
    );

    WinrateResult {
        p_a,
        p_b,
        score_a,
        score_b,
        delta,
        breakdown: ScoreBreakdown {
            base_a,
            base_b,
            tag_a: score_a - base_a,
            tag_b: score_b - base_b,
        },
    }
}
