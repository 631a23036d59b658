pub mod normalize;
pub mod record;
pub mod schema;
pub mod validate;

pub use normalize::{
    extract_json_object, normalize_battle_tags, normalize_battle_tags_value, normalize_profile,
    normalize_stats, CanonicalProfile, IncompleteProfile, IncompleteReason, ProfileOutcome,
};
pub use record::{ProfileRecord, RosterEntry};
pub use schema::{StatSchema, CURRENT_STATS_VERSION};
pub use validate::{
    roster_entries, validate_roster_dataset, validate_roster_value, ValidationDiagnostic,
    ValidationReport, ValidationSeverity,
};
