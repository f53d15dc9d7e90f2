//! Metric normalization.
//!
//! Turns raw request payloads into the typed inputs the classifiers accept.
//! Clients send numbers either as JSON numbers or as numeric strings, so both
//! are accepted. A JSON `null` counts as absent.

use crate::{BmiInput, DietInput, Error, FoodGroup, LungInput, RecoveryInput, Result};
use serde_json::{Map, Value};

/// Raw request payload: a JSON object
pub type Payload = Map<String, Value>;

/// Parse a request body into a JSON object
pub fn parse_body(body: Option<&str>) -> Result<Payload> {
    let raw = match body {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(Error::validation("body", "is required")),
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::validation("body", "must be a JSON object")),
        Err(e) => Err(Error::validation("body", format!("is not valid JSON ({})", e))),
    }
}

fn coerce_number(field: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(Error::validation(field, "must be numeric")),
    }
}

fn present<'a>(payload: &'a Payload, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|v| !v.is_null())
}

/// A numeric field that must be present
pub fn required_number(payload: &Payload, field: &str) -> Result<f64> {
    let value = present(payload, field).ok_or_else(|| Error::validation(field, "is required"))?;
    coerce_number(field, value)
}

/// A numeric field that defaults to zero when absent
pub fn optional_number(payload: &Payload, field: &str) -> Result<f64> {
    match present(payload, field) {
        Some(value) => coerce_number(field, value),
        None => Ok(0.0),
    }
}

/// A non-empty text field that must be present
pub fn required_text(payload: &Payload, field: &str) -> Result<String> {
    match present(payload, field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) | None => Err(Error::validation(field, "is required")),
        Some(_) => Err(Error::validation(field, "must be a string")),
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64> {
    if value < 0.0 {
        return Err(Error::validation(field, "must not be negative"));
    }
    Ok(value)
}

fn positive(field: &str, value: f64) -> Result<f64> {
    if value <= 0.0 {
        return Err(Error::validation(field, "must be greater than zero"));
    }
    Ok(value)
}

pub fn bmi_input(payload: &Payload) -> Result<BmiInput> {
    // Report every missing field together, the way the form labels them
    if present(payload, "height").is_none() || present(payload, "weight").is_none() {
        return Err(Error::validation(
            "height and weight",
            "are required",
        ));
    }
    Ok(BmiInput {
        height_cm: positive("height", required_number(payload, "height")?)?,
        weight_kg: positive("weight", required_number(payload, "weight")?)?,
    })
}

pub fn lung_input(payload: &Payload) -> Result<LungInput> {
    Ok(LungInput {
        age: non_negative("age", required_number(payload, "age")?)?,
        gender: required_text(payload, "gender")?,
        pulse: positive("pulse", required_number(payload, "pulse")?)?,
        breath_hold_seconds: non_negative(
            "breathHoldTime",
            required_number(payload, "breathHoldTime")?,
        )?,
    })
}

pub fn diet_input(payload: &Payload) -> Result<DietInput> {
    let mut input = DietInput::default();
    for group in FoodGroup::ALL {
        let field = group.field_name();
        input.set_servings(group, non_negative(field, optional_number(payload, field)?)?);
    }
    Ok(input)
}

pub fn recovery_input(payload: &Payload) -> Result<RecoveryInput> {
    Ok(RecoveryInput {
        sleep_hours: non_negative("sleep", required_number(payload, "sleep")?)?,
        workout_recovery_minutes: non_negative(
            "workoutRecovery",
            required_number(payload, "workoutRecovery")?,
        )?,
        relaxation_minutes: non_negative("relaxation", required_number(payload, "relaxation")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_body_rejects_missing_and_malformed() {
        assert_eq!(field_of(parse_body(None).unwrap_err()), "body");
        assert_eq!(field_of(parse_body(Some("  ")).unwrap_err()), "body");
        assert_eq!(field_of(parse_body(Some("{not json")).unwrap_err()), "body");
        assert_eq!(field_of(parse_body(Some("[1, 2]")).unwrap_err()), "body");
        assert!(parse_body(Some(r#"{"height": 170}"#)).is_ok());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let p = payload(json!({"height": "170", "weight": 70}));
        let input = bmi_input(&p).unwrap();
        assert_eq!(input.height_cm, 170.0);
        assert_eq!(input.weight_kg, 70.0);
    }

    #[test]
    fn test_bmi_missing_field() {
        let p = payload(json!({"height": 170}));
        assert_eq!(field_of(bmi_input(&p).unwrap_err()), "height and weight");

        let p = payload(json!({"height": 170, "weight": null}));
        assert!(bmi_input(&p).is_err());
    }

    #[test]
    fn test_bmi_non_numeric_and_zero() {
        let p = payload(json!({"height": "tall", "weight": 70}));
        assert_eq!(field_of(bmi_input(&p).unwrap_err()), "height");

        let p = payload(json!({"height": 0, "weight": 70}));
        assert_eq!(field_of(bmi_input(&p).unwrap_err()), "height");
    }

    #[test]
    fn test_lung_rejects_zero_pulse() {
        let p = payload(json!({
            "age": 30, "gender": "female", "pulse": 0, "breathHoldTime": 40
        }));
        assert_eq!(field_of(lung_input(&p).unwrap_err()), "pulse");
    }

    #[test]
    fn test_lung_requires_gender() {
        let p = payload(json!({"age": 30, "pulse": 70, "breathHoldTime": 40}));
        assert_eq!(field_of(lung_input(&p).unwrap_err()), "gender");
    }

    #[test]
    fn test_diet_optional_fields_default_to_zero() {
        let p = payload(json!({"vegetables": 4, "nutsSeeds": "1"}));
        let input = diet_input(&p).unwrap();
        assert_eq!(input.servings(FoodGroup::Vegetables), 4.0);
        assert_eq!(input.servings(FoodGroup::NutsSeeds), 1.0);
        assert_eq!(input.servings(FoodGroup::Dairy), 0.0);
    }

    #[test]
    fn test_diet_rejects_negative_servings() {
        let p = payload(json!({"fruits": -1}));
        assert_eq!(field_of(diet_input(&p).unwrap_err()), "fruits");
    }

    #[test]
    fn test_recovery_requires_all_fields() {
        let p = payload(json!({"sleep": 8, "relaxation": 30}));
        assert_eq!(field_of(recovery_input(&p).unwrap_err()), "workoutRecovery");
    }
}
