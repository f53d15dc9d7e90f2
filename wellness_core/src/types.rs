//! Core domain types for the wellness calculators.
//!
//! This module defines the fundamental types used throughout the system:
//! - Typed metric inputs, one per calculator
//! - Category labels each classifier maps into
//! - Food groups and the recommendation keys derived from them
//! - Calculator results as they are serialized to callers

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Metric Inputs
// ============================================================================

/// Height and weight as submitted to the BMI calculator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiInput {
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Inputs to the lung-health score
///
/// `age` and `gender` are required by the endpoint but do not enter the
/// score itself.
#[derive(Clone, Debug, PartialEq)]
pub struct LungInput {
    pub age: f64,
    pub gender: String,
    pub pulse: f64,
    pub breath_hold_seconds: f64,
}

/// Daily servings per food group; absent groups are zero
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DietInput {
    servings: [f64; FoodGroup::ALL.len()],
}

impl DietInput {
    pub fn servings(&self, group: FoodGroup) -> f64 {
        self.servings[group.index()]
    }

    pub fn set_servings(&mut self, group: FoodGroup, servings: f64) {
        self.servings[group.index()] = servings;
    }

    pub fn with(mut self, group: FoodGroup, servings: f64) -> Self {
        self.set_servings(group, servings);
        self
    }
}

/// Sleep hours plus daily recovery and relaxation minutes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecoveryInput {
    pub sleep_hours: f64,
    pub workout_recovery_minutes: f64,
    pub relaxation_minutes: f64,
}

// ============================================================================
// Categories
// ============================================================================

/// BMI range a measurement falls into
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }

    /// Fixed point value attached to each range
    pub fn points(&self) -> u8 {
        match self {
            BmiCategory::Underweight => 1,
            BmiCategory::Normal => 2,
            BmiCategory::Overweight => 3,
            BmiCategory::Obese => 4,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "You are underweight. You might need to increase your calorie intake to reach a healthier weight."
            }
            BmiCategory::Normal => {
                "You are in the normal BMI range. Keep up the good work maintaining a balanced diet and regular exercise."
            }
            BmiCategory::Overweight => {
                "You are overweight. Incorporating more physical activity and a balanced diet can help reach a healthier weight."
            }
            BmiCategory::Obese => {
                "You are in the obese range. It might be beneficial to consult with a healthcare provider for personalized advice."
            }
        }
    }
}

/// Intake relative to the recommended servings for a food group
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntakeCategory {
    Below,
    At,
    Above,
}

impl IntakeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeCategory::Below => "below",
            IntakeCategory::At => "at",
            IntakeCategory::Above => "above",
        }
    }
}

impl fmt::Display for IntakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nightly sleep duration band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SleepBand {
    Short,
    Ideal,
    Long,
}

/// Whether daily minutes spent on an activity meet the threshold
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sufficiency {
    Insufficient,
    Sufficient,
}

// ============================================================================
// Food Groups and Recommendation Keys
// ============================================================================

/// Food groups tracked by the diet report, in presentation order
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FoodGroup {
    #[serde(rename = "vegetables")]
    Vegetables,
    #[serde(rename = "protein")]
    Protein,
    #[serde(rename = "grains")]
    Grains,
    #[serde(rename = "nutsSeeds")]
    NutsSeeds,
    #[serde(rename = "dairy")]
    Dairy,
    #[serde(rename = "fruits")]
    Fruits,
}

impl FoodGroup {
    pub const ALL: [FoodGroup; 6] = [
        FoodGroup::Vegetables,
        FoodGroup::Protein,
        FoodGroup::Grains,
        FoodGroup::NutsSeeds,
        FoodGroup::Dairy,
        FoodGroup::Fruits,
    ];

    fn index(&self) -> usize {
        match self {
            FoodGroup::Vegetables => 0,
            FoodGroup::Protein => 1,
            FoodGroup::Grains => 2,
            FoodGroup::NutsSeeds => 3,
            FoodGroup::Dairy => 4,
            FoodGroup::Fruits => 5,
        }
    }

    /// Name of the request/response field for this group
    pub fn field_name(&self) -> &'static str {
        match self {
            FoodGroup::Vegetables => "vegetables",
            FoodGroup::Protein => "protein",
            FoodGroup::Grains => "grains",
            FoodGroup::NutsSeeds => "nutsSeeds",
            FoodGroup::Dairy => "dairy",
            FoodGroup::Fruits => "fruits",
        }
    }

    /// Prefix used when composing recommendation keys
    pub fn key_prefix(&self) -> &'static str {
        match self {
            FoodGroup::Vegetables => "veg",
            FoodGroup::Protein => "protein",
            FoodGroup::Grains => "grains",
            FoodGroup::NutsSeeds => "nuts",
            FoodGroup::Dairy => "dairy",
            FoodGroup::Fruits => "fruits",
        }
    }

    /// Recommended daily servings
    pub fn recommended_servings(&self) -> f64 {
        match self {
            FoodGroup::Vegetables => 3.0,
            FoodGroup::Protein => 2.0,
            FoodGroup::Grains => 5.0,
            FoodGroup::NutsSeeds => 1.0,
            FoodGroup::Dairy => 2.0,
            FoodGroup::Fruits => 2.0,
        }
    }
}

/// Key of a pre-authored recommendation record, e.g. `veg-below`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationKey(String);

impl RecommendationKey {
    pub fn new(group: FoodGroup, category: IntakeCategory) -> Self {
        Self::compose(group.key_prefix(), category.as_str())
    }

    /// Compose a key from any domain prefix and category label
    pub fn compose(domain: &str, category: &str) -> Self {
        Self(format!("{}-{}", domain, category))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecommendationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of the BMI calculator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
    pub message: String,
    pub points: u8,
}

/// Outcome of the lung-health calculator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LungResult {
    pub score: f64,
}

/// Recovery report returned to callers
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecoveryReport {
    pub message: String,
    pub data: RecoveryData,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryData {
    pub sleep: String,
    pub workout_recovery: String,
    pub relaxation: String,
    pub personalized_feedback: String,
}
