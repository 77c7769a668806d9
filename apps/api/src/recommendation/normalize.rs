//! Response normalizer: turns raw model text into JSON the schema validator
//! can judge, absorbing the usual formatting quirks.
//!
//! Steps, in order:
//! 1. strip one ```json fence pair
//! 2. parse JSON (failure is fatal for the request)
//! 3. per item in `items`: coerce/rescale/clamp `score`, backfill `rank`
//!
//! Anything without an `items` array passes through untouched.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Strips one leading ```json line and one trailing ``` line. Not recursive,
/// and a bare ``` opener is left alone.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let text = match text.strip_prefix("```json") {
        Some(rest) => rest.strip_prefix('\n').unwrap_or(rest),
        None => text,
    };
    match text.strip_suffix("```") {
        Some(rest) => rest.strip_suffix('\n').unwrap_or(rest),
        None => text,
    }
}

pub fn normalize_response(raw: &str) -> Result<Value, NormalizeError> {
    let mut value: Value = serde_json::from_str(strip_code_fence(raw))?;
    normalize_items(&mut value);
    Ok(value)
}

/// Normalizes every element of `items` in place.
pub fn normalize_items(value: &mut Value) {
    let Some(items) = value.get_mut("items").and_then(Value::as_array_mut) else {
        return;
    };

    for (index, item) in items.iter_mut().enumerate() {
        let Some(fields) = item.as_object_mut() else {
            continue;
        };

        if let Some(score) = fields.get_mut("score") {
            *score = normalize_score(score);
        }

        // Falsy ranks are replaced, so an explicit 0 becomes index + 1 as well.
        if is_falsy(fields.get("rank")) {
            fields.insert("rank".to_string(), Value::from(index as u64 + 1));
        }
    }
}

/// Maps a raw score onto [0, 1].
///
/// Numeric strings are coerced first; non-numeric strings and other types are
/// returned unchanged so the validator can reject them.
pub fn normalize_score(score: &Value) -> Value {
    match score {
        Value::Number(number) => match number.as_f64() {
            Some(raw) if (0.0..=1.0).contains(&raw) => score.clone(),
            Some(raw) => Value::from(rescale(raw)),
            None => score.clone(),
        },
        Value::String(text) => match parse_finite(text) {
            Some(raw) => Value::from(rescale(raw)),
            None => score.clone(),
        },
        _ => score.clone(),
    }
}

/// (1, 100] is read as a percentage; the clamp runs after that.
fn rescale(raw: f64) -> f64 {
    let mut score = raw;
    if score > 1.0 && score <= 100.0 {
        score /= 100.0;
    }
    if score > 1.0 {
        score = 1.0;
    }
    if score < 0.0 {
        score = 0.0;
    }
    score
}

fn parse_finite(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn score(value: Value) -> f64 {
        normalize_score(&value).as_f64().unwrap()
    }

    #[test]
    fn test_percentages_are_rescaled() {
        assert!((score(json!(50)) - 0.5).abs() < f64::EPSILON);
        assert!((score(json!(85)) - 0.85).abs() < f64::EPSILON);
        assert!((score(json!(100)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_in_range_scores_pass_through() {
        assert_eq!(normalize_score(&json!(1.0)), json!(1.0));
        assert_eq!(normalize_score(&json!(0)), json!(0));
        assert_eq!(normalize_score(&json!(0.42)), json!(0.42));
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(score(json!(-5)), 0.0);
        assert_eq!(score(json!(250)), 1.0);
        assert!((score(json!(1.5)) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        assert!((score(json!("0.7")) - 0.7).abs() < f64::EPSILON);
        assert!((score(json!(" 90 ")) - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_numeric_strings_are_kept() {
        assert_eq!(normalize_score(&json!("abc")), json!("abc"));
        assert_eq!(normalize_score(&json!("")), json!(""));
        assert_eq!(normalize_score(&json!("NaN")), json!("NaN"));
        assert_eq!(normalize_score(&json!("inf")), json!("inf"));
    }

    #[test]
    fn test_other_types_are_kept() {
        assert_eq!(normalize_score(&json!(null)), json!(null));
        assert_eq!(normalize_score(&json!([0.5])), json!([0.5]));
    }

    #[test]
    fn test_missing_ranks_follow_position() {
        let mut value = json!({ "items": [{}, {}] });
        normalize_items(&mut value);
        assert_eq!(value["items"][0]["rank"], json!(1));
        assert_eq!(value["items"][1]["rank"], json!(2));
    }

    #[test]
    fn test_explicit_ranks_are_kept_except_falsy_ones() {
        let mut value = json!({
            "items": [{"rank": 3}, {"rank": 0}, {"rank": null}, {"rank": ""}, {"rank": "2"}]
        });
        normalize_items(&mut value);
        let ranks: Vec<Value> = value["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["rank"].clone())
            .collect();
        assert_eq!(ranks, vec![json!(3), json!(2), json!(3), json!(4), json!("2")]);
    }

    #[test]
    fn test_strip_code_fence_json_tag() {
        let raw = "```json\n{\"items\":[]}\n```";
        assert_eq!(strip_code_fence(raw), "{\"items\":[]}");
    }

    #[test]
    fn test_strip_code_fence_only_one_pair() {
        let raw = "```json\n```json\n{}\n```\n```";
        assert_eq!(strip_code_fence(raw), "```json\n{}\n```");
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "```\n{}");
    }

    #[test]
    fn test_normalize_response_end_to_end() {
        let raw = "```json\n{\"items\":[{\"candidateId\":\"c1\",\"name\":\"Ann\",\"score\":85,\"rationale\":\"strong fit\"}]}\n```";
        let value = normalize_response(raw).unwrap();
        assert_eq!(value["items"][0]["rank"], json!(1));
        assert!((value["items"][0]["score"].as_f64().unwrap() - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_response_rejects_prose() {
        assert!(matches!(
            normalize_response("Here are the best candidates: Ann, Bob"),
            Err(NormalizeError::Parse(_))
        ));
    }

    #[test]
    fn test_objects_without_items_pass_through() {
        let value = normalize_response(r#"{"results":[{"score":90}]}"#).unwrap();
        assert_eq!(value, json!({"results":[{"score":90}]}));

        let value = normalize_response(r#"{"items":{"score":90}}"#).unwrap();
        assert_eq!(value, json!({"items":{"score":90}}));
    }
}
