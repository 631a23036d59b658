use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::balance::Balance;
use crate::battle::bonus::TagBonus;
use crate::battle::fighter::Fighter;
use crate::battle::highlights::{build_highlights, DEFAULT_MAX_HIGHLIGHTS};
use crate::battle::tags::CanonicalTag;
use crate::battle::winrate::{calc_winrate_with_damping, WinrateResult};
use crate::error::EngineError;
use crate::profile::normalize::normalize_profile;

/// Upper bound on requested highlight lines.
pub const MAX_HIGHLIGHTS_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "duelist-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct TagListItem<'a> {
    pub name: &'static str,
    pub index: usize,
    pub bonus: &'a TagBonus,
}

pub fn tags_payload(balance: &Balance) -> Result<String, serde_json::Error> {
    let tags: Vec<TagListItem<'_>> = balance
        .bonuses()
        .iter()
        .map(|(tag, bonus)| TagListItem {
            name: tag.as_str(),
            index: tag.index(),
            bonus,
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "count": CanonicalTag::ALL.len(),
        "tags": tags
    }))
}

/// Never fails on malformed input; degraded text comes back as an incomplete outcome.
pub fn normalize_payload(body: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&normalize_profile(body))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    pub a: Fighter,
    pub b: Fighter,
    #[serde(default)]
    pub k: Option<f64>,
    #[serde(default)]
    pub max: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub a_id: String,
    pub b_id: String,
    pub damping: f64,
    pub result: WinrateResult,
    pub highlights: Vec<String>,
}

pub fn compare_payload(body: &str, balance: &Balance) -> Result<String, ApiError> {
    let req: CompareRequest = serde_json::from_str(body)?;
    req.a.stats.validate()?;
    req.b.stats.validate()?;

    let damping = req.k.unwrap_or_else(|| balance.damping());
    let result = calc_winrate_with_damping(&req.a, &req.b, balance, damping)?;
    let max = req
        .max
        .unwrap_or(DEFAULT_MAX_HIGHLIGHTS)
        .min(MAX_HIGHLIGHTS_LIMIT);
    let highlights = build_highlights(&req.a, &req.b, balance, max);

    let response = CompareResponse {
        a_id: req.a.id,
        b_id: req.b.id,
        damping,
        result,
        highlights,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}
