//! Dataset validation for stored profile rosters (JSON array or `{ "profiles": [...] }`).
//! Each diagnostic carries a severity and a context path such as `entry[3].battle_tags[1]`.

use std::collections::HashSet;
use std::fmt;
use std::fs;

use serde_json::{Map, Value};

use crate::battle::stats::{StatKey, HP_MAX, HP_MIN, HP_STEP, STAT_MAX, STAT_MIN};
use crate::battle::tags::{CanonicalTag, TAGS_PER_PROFILE};
use crate::profile::schema::StatSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Entries of a roster payload: a bare array or `{ "profiles": [...] }`.
pub fn roster_entries(payload: &Value) -> Option<&Vec<Value>> {
    payload
        .get("profiles")
        .and_then(Value::as_array)
        .or_else(|| payload.as_array())
}

pub fn validate_roster_dataset(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;
    validate_roster_value(&payload)
}

pub fn validate_roster_value(payload: &Value) -> Result<ValidationReport, String> {
    let entries = roster_entries(payload)
        .ok_or_else(|| "expected top-level JSON array or { profiles: [...] }".to_string())?;

    let mut report = ValidationReport::default();
    let mut seen_ids = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let base_context = format!("entry[{index}]");
        let Some(object) = entry.as_object() else {
            report.push(
                ValidationSeverity::Error,
                base_context,
                "entry is not an object",
            );
            continue;
        };

        match object.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => {
                if !seen_ids.insert(id.to_string()) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{base_context}.id"),
                        format!("duplicate id '{id}'"),
                    );
                }
            }
            _ => report.push(
                ValidationSeverity::Error,
                format!("{base_context}.id"),
                "missing non-empty 'id'",
            ),
        }

        match object.get("name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => {}
            _ => report.push(
                ValidationSeverity::Error,
                format!("{base_context}.name"),
                "missing non-empty 'name'",
            ),
        }

        validate_stats(&mut report, object, &base_context);
        validate_tags(&mut report, object, &base_context);

        if !object
            .get("battle_stats_version")
            .is_some_and(Value::is_i64)
        {
            report.push(
                ValidationSeverity::Info,
                format!("{base_context}.battle_stats_version"),
                "no integer version stamp",
            );
        }
    }

    Ok(report)
}

fn validate_stats(report: &mut ValidationReport, object: &Map<String, Value>, base_context: &str) {
    let context = format!("{base_context}.battle_stats");
    let Some(stats) = object.get("battle_stats").filter(|value| !value.is_null()) else {
        report.push(
            ValidationSeverity::Error,
            context,
            "missing 'battle_stats' (profile is incomplete)",
        );
        return;
    };
    let Some(stats_obj) = stats.as_object() else {
        report.push(ValidationSeverity::Error, context, "expected object");
        return;
    };

    match StatSchema::detect(stats) {
        StatSchema::Legacy => {
            report.push(
                ValidationSeverity::Error,
                context,
                "legacy stat schema (power/toughness/speed/control/burst/sustain); needs re-analysis",
            );
            return;
        }
        StatSchema::Unknown => report.push(
            ValidationSeverity::Warning,
            context.clone(),
            "stat schema not recognized",
        ),
        StatSchema::Current => {}
    }

    let hp = stats_obj.get("hp");
    match hp.and_then(Value::as_u64) {
        Some(hp) if (u64::from(HP_MIN)..=u64::from(HP_MAX)).contains(&hp)
            && hp % u64::from(HP_STEP) == 0 => {}
        Some(hp) => report.push(
            ValidationSeverity::Error,
            format!("{context}.hp"),
            format!("hp {hp} is not a multiple of {HP_STEP} in [{HP_MIN}, {HP_MAX}]"),
        ),
        None if hp.is_some_and(Value::is_number) => report.push(
            ValidationSeverity::Error,
            format!("{context}.hp"),
            "hp must be a non-negative integer",
        ),
        None => report.push(
            ValidationSeverity::Error,
            format!("{context}.hp"),
            "missing numeric 'hp'",
        ),
    }

    for key in StatKey::ALL {
        let field = key.as_str();
        match stats_obj.get(field).and_then(Value::as_f64) {
            Some(value) if (STAT_MIN..=STAT_MAX).contains(&value) => {}
            Some(value) => report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}"),
                format!("{field} {value} is outside [{STAT_MIN}, {STAT_MAX}]"),
            ),
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}"),
                format!("missing numeric '{field}'"),
            ),
        }
    }
}

fn validate_tags(report: &mut ValidationReport, object: &Map<String, Value>, base_context: &str) {
    let context = format!("{base_context}.battle_tags");
    let Some(tags) = object.get("battle_tags").filter(|value| !value.is_null()) else {
        report.push(
            ValidationSeverity::Error,
            context,
            "missing 'battle_tags' (profile is incomplete)",
        );
        return;
    };
    let Some(tags) = tags.as_array() else {
        report.push(ValidationSeverity::Error, context, "expected array");
        return;
    };

    if tags.len() != TAGS_PER_PROFILE {
        report.push(
            ValidationSeverity::Error,
            context.clone(),
            format!("expected exactly {TAGS_PER_PROFILE} tags, found {}", tags.len()),
        );
    }

    let mut seen = HashSet::new();
    for (tag_index, tag) in tags.iter().enumerate() {
        let tag_context = format!("{context}[{tag_index}]");
        match tag.as_str() {
            Some(name) if CanonicalTag::is_canonical(name) => {
                if !seen.insert(name.trim()) {
                    report.push(
                        ValidationSeverity::Error,
                        tag_context,
                        format!("duplicate tag '{name}'"),
                    );
                }
            }
            Some(name) => report.push(
                ValidationSeverity::Error,
                tag_context,
                format!("'{name}' is not a canonical tag"),
            ),
            None => report.push(ValidationSeverity::Error, tag_context, "tag is not a string"),
        }
    }
}
