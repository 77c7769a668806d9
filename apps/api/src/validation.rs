//! Input validation for profile writes.
//!
//! Every check collects `FieldViolation`s instead of stopping at the first
//! problem, so callers get the full list back in one response.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::candidate::CandidateInput;
use crate::models::hr::HrProfileInput;
use crate::models::job::NewJob;

pub const MAX_EXPERIENCE_YEARS: i32 = 60;

/// A single rule violation, addressed by a dotted path (`items.0.score`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub fn validate_candidate_input(input: &CandidateInput) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if let Some(experience) = input.experience {
        check_experience("experience", experience, &mut violations);
    }

    if let Some(preferences) = &input.preferences {
        if !preferences.is_object() {
            violations.push(FieldViolation::new(
                "preferences",
                "must be an object",
            ));
        }
    }

    if let Some(url) = &input.resume_url {
        if Url::parse(url).is_err() {
            violations.push(FieldViolation::new("resumeUrl", "must be a valid URL"));
        }
    }

    violations
}

pub fn validate_new_job(job: &NewJob) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    check_length("title", &job.title, 2, 120, &mut violations);
    check_length("description", &job.description, 10, 5000, &mut violations);

    if job.required_skills.is_empty() {
        violations.push(FieldViolation::new(
            "requiredSkills",
            "must contain at least 1 skill",
        ));
    }

    if let Some(location) = &job.location {
        check_length("location", location, 0, 120, &mut violations);
    }
    if let Some(experience) = job.experience {
        check_experience("experience", experience, &mut violations);
    }
    if let Some(salary_range) = &job.salary_range {
        check_length("salaryRange", salary_range, 0, 120, &mut violations);
    }

    violations
}

pub fn validate_hr_profile(input: &HrProfileInput) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_length("company", input.company.trim(), 1, 120, &mut violations);
    violations
}

fn check_length(
    path: &str,
    value: &str,
    min: usize,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) {
    let len = value.chars().count();
    if len < min {
        violations.push(FieldViolation::new(
            path,
            format!("must be at least {min} characters"),
        ));
    } else if len > max {
        violations.push(FieldViolation::new(
            path,
            format!("must be at most {max} characters"),
        ));
    }
}

fn check_experience(path: &str, years: i32, violations: &mut Vec<FieldViolation>) {
    if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
        violations.push(FieldViolation::new(
            path,
            format!("must be between 0 and {MAX_EXPERIENCE_YEARS}"),
        ));
    }
}

/// Human-readable JSON type name, used in violation messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
