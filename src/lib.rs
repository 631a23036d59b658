//! Combat-profile normalization and a deterministic winrate/highlight engine.
//!
//! [profile] turns untrusted model output into canonical stats and tags; [battle] compares
//! two canonical fighters under a [battle::Balance]. The engine never re-interprets stored
//! data: anything non-canonical at the comparison boundary is an [error::EngineError].

pub mod battle;
pub mod cli;
pub mod error;
pub mod parallel;
pub mod profile;
pub mod server;

pub use battle::{build_highlights, calc_winrate, Balance, Fighter, WinrateResult};
pub use error::{ConfigError, EngineError};
pub use profile::{normalize_profile, ProfileOutcome};
