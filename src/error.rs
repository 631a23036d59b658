use thiserror::Error;

/// Contract violations at the comparison boundary. Malformed model output is not an error;
/// it surfaces as [crate::profile::ProfileOutcome::Incomplete].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown tag '{0}'")]
    UnknownTag(String),

    #[error("invalid tag set: {0}")]
    InvalidTagSet(String),

    #[error("invalid stats: {0}")]
    InvalidStats(String),

    #[error("incomplete profile for '{id}': missing {missing}")]
    IncompleteProfile { id: String, missing: &'static str },

    #[error("damping constant must be strictly positive, got {0}")]
    NonPositiveDamping(f64),

    #[error("unable to build worker pool: {0}")]
    WorkerPool(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("damping constant must be strictly positive and finite, got {0}")]
    InvalidDamping(f64),

    #[error("weight for '{field}' must be finite, got {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("tag bonus table has no entry for '{0}'")]
    MissingTagBonus(String),

    #[error("tag bonus table names unknown tag '{0}'")]
    UnknownTagBonus(String),

    #[error("tag bonus for '{tag}' has non-finite '{field}'")]
    InvalidTagBonus { tag: String, field: &'static str },

    #[error("unable to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("unable to parse '{path}': {message}")]
    Parse { path: String, message: String },
}
