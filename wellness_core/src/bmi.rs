//! Body mass index calculation and classification.
//!
//! Ranges are half-open and contiguous:
//! - `bmi < 18.5` → underweight
//! - `18.5 <= bmi < 24.9` → normal
//! - `24.9 <= bmi < 29.9` → overweight
//! - `bmi >= 29.9` → obese

use crate::{BmiCategory, BmiInput, BmiResult, Error, Result};

const NORMAL_FROM: f64 = 18.5;
const OVERWEIGHT_FROM: f64 = 24.9;
const OBESE_FROM: f64 = 29.9;

/// BMI from height in centimetres and weight in kilograms, rounded to 2 places
pub fn calculate_bmi(input: &BmiInput) -> Result<f64> {
    let height_m = input.height_cm / 100.0;
    let bmi = (input.weight_kg / (height_m * height_m) * 100.0).round() / 100.0;

    if !bmi.is_finite() {
        return Err(Error::Internal(format!(
            "BMI is not finite for height {} cm, weight {} kg",
            input.height_cm, input.weight_kg
        )));
    }

    Ok(bmi)
}

/// Map a BMI value to its range
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < NORMAL_FROM {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_FROM {
        BmiCategory::Normal
    } else if bmi < OBESE_FROM {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Calculate, classify and attach the static points/message for the range
pub fn assess_bmi(input: &BmiInput) -> Result<BmiResult> {
    let bmi = calculate_bmi(input)?;
    let category = classify_bmi(bmi);
    tracing::debug!("BMI {} classified as {}", bmi, category.as_str());

    Ok(BmiResult {
        bmi,
        category,
        message: category.message().to_string(),
        points: category.points(),
    })
}
