//! Diet intake classification.
//!
//! Each food group is compared against its recommended daily servings on its
//! own; the six classifications do not influence one another.

use crate::{DietInput, FoodGroup, IntakeCategory, RecommendationKey};

/// Classify servings against the group's recommendation
pub fn classify_intake(group: FoodGroup, servings: f64) -> IntakeCategory {
    let recommended = group.recommended_servings();
    if servings < recommended {
        IntakeCategory::Below
    } else if servings == recommended {
        IntakeCategory::At
    } else {
        IntakeCategory::Above
    }
}

/// One classification per food group, in presentation order
pub fn classify_diet(input: &DietInput) -> Vec<(FoodGroup, IntakeCategory)> {
    FoodGroup::ALL
        .iter()
        .map(|group| (*group, classify_intake(*group, input.servings(*group))))
        .collect()
}

/// Recommendation keys for every group of a diet submission
pub fn recommendation_keys(input: &DietInput) -> Vec<(FoodGroup, RecommendationKey)> {
    classify_diet(input)
        .into_iter()
        .map(|(group, category)| (group, RecommendationKey::new(group, category)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_recommendation_is_at() {
        for group in FoodGroup::ALL {
            assert_eq!(
                classify_intake(group, group.recommended_servings()),
                IntakeCategory::At
            );
        }
    }

    #[test]
    fn test_below_and_above() {
        assert_eq!(classify_intake(FoodGroup::Grains, 4.5), IntakeCategory::Below);
        assert_eq!(classify_intake(FoodGroup::Grains, 5.5), IntakeCategory::Above);
        assert_eq!(classify_intake(FoodGroup::NutsSeeds, 0.0), IntakeCategory::Below);
    }

    #[test]
    fn test_keys_follow_presentation_order() {
        let input = DietInput::default()
            .with(FoodGroup::Vegetables, 3.0)
            .with(FoodGroup::Protein, 4.0);

        let keys: Vec<String> = recommendation_keys(&input)
            .into_iter()
            .map(|(_, key)| key.to_string())
            .collect();

        assert_eq!(
            keys,
            vec![
                "veg-at",
                "protein-above",
                "grains-below",
                "nuts-below",
                "dairy-below",
                "fruits-below",
            ]
        );
    }
}
