//! Ranked-result contract.
//!
//! Runs after `normalize`; takes loose JSON and either returns a typed
//! `Recommendation<T>` or every violation it found, addressed by path.
//! Keys outside the contract are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{type_name, FieldViolation};

/// One ranked subject, independent of direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedParts {
    pub rank: u32,
    pub subject_id: Option<String>,
    pub display: Option<String>,
    pub score: f64,
    pub rationale: String,
}

/// A concrete ranked-item shape. The two directions differ only in the names
/// of the identifier and display fields.
pub trait RankedSubject: Sized + Serialize {
    const ID_FIELD: &'static str;
    const DISPLAY_FIELD: &'static str;

    fn from_parts(parts: RankedParts) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub rank: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub score: f64,
    pub rationale: String,
}

impl RankedSubject for RankedCandidate {
    const ID_FIELD: &'static str = "candidateId";
    const DISPLAY_FIELD: &'static str = "name";

    fn from_parts(parts: RankedParts) -> Self {
        Self {
            rank: parts.rank,
            candidate_id: parts.subject_id,
            name: parts.display,
            score: parts.score,
            rationale: parts.rationale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob {
    pub rank: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub score: f64,
    pub rationale: String,
}

impl RankedSubject for RankedJob {
    const ID_FIELD: &'static str = "jobId";
    const DISPLAY_FIELD: &'static str = "title";

    fn from_parts(parts: RankedParts) -> Self {
        Self {
            rank: parts.rank,
            job_id: parts.subject_id,
            title: parts.display,
            score: parts.score,
            rationale: parts.rationale,
        }
    }
}

/// Ordered list of ranked items; never empty once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation<T> {
    pub items: Vec<T>,
}

pub fn validate_recommendation<T: RankedSubject>(
    value: &Value,
) -> Result<Recommendation<T>, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(vec![FieldViolation::new(
            "",
            format!("Expected object, received {}", type_name(value)),
        )]);
    };

    let items = match root.get("items") {
        None => {
            return Err(vec![FieldViolation::new("items", "Required")]);
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(vec![FieldViolation::new(
                "items",
                format!("Expected array, received {}", type_name(other)),
            )]);
        }
    };

    if items.is_empty() {
        return Err(vec![FieldViolation::new(
            "items",
            "must contain at least 1 item",
        )]);
    }

    let mut validated = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("items.{index}");
        match item.as_object() {
            Some(fields) => {
                if let Some(parts) = validate_item::<T>(&path, fields, &mut violations) {
                    validated.push(T::from_parts(parts));
                }
            }
            None => violations.push(FieldViolation::new(
                path,
                format!("Expected object, received {}", type_name(item)),
            )),
        }
    }

    if violations.is_empty() {
        Ok(Recommendation { items: validated })
    } else {
        Err(violations)
    }
}

fn validate_item<T: RankedSubject>(
    path: &str,
    fields: &Map<String, Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<RankedParts> {
    let before = violations.len();

    let rank = check_rank(&format!("{path}.rank"), fields.get("rank"), violations);
    let subject_id = check_optional_string(
        &format!("{path}.{}", T::ID_FIELD),
        fields.get(T::ID_FIELD),
        violations,
    );
    let display = check_optional_string(
        &format!("{path}.{}", T::DISPLAY_FIELD),
        fields.get(T::DISPLAY_FIELD),
        violations,
    );
    let score = check_score(&format!("{path}.score"), fields.get("score"), violations);
    let rationale = check_rationale(
        &format!("{path}.rationale"),
        fields.get("rationale"),
        violations,
    );

    if violations.len() != before {
        return None;
    }

    Some(RankedParts {
        rank: rank?,
        subject_id,
        display,
        score: score?,
        rationale: rationale?,
    })
}

fn check_rank(
    path: &str,
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<u32> {
    let number = require_number(path, value, violations)?;

    if number.fract() != 0.0 {
        violations.push(FieldViolation::new(path, "Expected integer, received float"));
        return None;
    }
    if number < 1.0 {
        violations.push(FieldViolation::new(
            path,
            "must be greater than or equal to 1",
        ));
        return None;
    }
    if number > f64::from(u32::MAX) {
        violations.push(FieldViolation::new(path, "is too large"));
        return None;
    }

    Some(number as u32)
}

fn check_score(
    path: &str,
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    let number = require_number(path, value, violations)?;

    if !(0.0..=1.0).contains(&number) {
        violations.push(FieldViolation::new(path, "must be between 0 and 1"));
        return None;
    }

    Some(number)
}

fn check_rationale(
    path: &str,
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value {
        None => {
            violations.push(FieldViolation::new(path, "Required"));
            None
        }
        Some(Value::String(text)) if text.is_empty() => {
            violations.push(FieldViolation::new(
                path,
                "must contain at least 1 character",
            ));
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            violations.push(FieldViolation::new(
                path,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn check_optional_string(
    path: &str,
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            violations.push(FieldViolation::new(
                path,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn require_number(
    path: &str,
    value: Option<&Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    match value {
        None => {
            violations.push(FieldViolation::new(path, "Required"));
            None
        }
        Some(Value::Number(number)) => number.as_f64(),
        Some(other) => {
            violations.push(FieldViolation::new(
                path,
                format!("Expected number, received {}", type_name(other)),
            ));
            None
        }
    }
}
