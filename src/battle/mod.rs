pub mod balance;
pub mod bonus;
pub mod fighter;
pub mod highlights;
pub mod scoring;
pub mod stats;
pub mod tags;
pub mod winrate;

pub use balance::{balance_from_env, load_balance, Balance, BalanceFile, DEFAULT_DAMPING};
pub use bonus::{TagBonus, TagBonusTable};
pub use fighter::Fighter;
pub use highlights::{
    build_highlights, core_tag, rank_highlights, Highlight, HighlightKey, DEFAULT_MAX_HIGHLIGHTS,
    FALLBACK_HIGHLIGHTS,
};
pub use scoring::{score, WeightTable};
pub use stats::{
    hp_to_unit_scale, BattleStats, StatKey, BONUS_STAT_MAX, HP_DEFAULT, HP_MAX, HP_MIN, HP_STEP,
    STAT_MAX, STAT_MIN,
};
pub use tags::{CanonicalTag, TagSet, TAGS_PER_PROFILE, TAG_COUNT};
pub use winrate::{
    apply_tag_bonus, calc_winrate, calc_winrate_with_damping, logistic, post_bonus_score,
    BonusApplied, ScoreBreakdown, WinrateResult,
};
