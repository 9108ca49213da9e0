//! Same-day nutrition recommendations.

use crate::{CheckIn, Priority, ProteinLevel};
use serde::Serialize;

const HYDRATION_TRIGGER_BOTTLES: i32 = 6;
const HYDRATION_TARGET_BOTTLES: i32 = 8;
/// From this hour on, suggest an overnight recovery snack
const EVENING_HOUR: u32 = 20;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NutritionTopic {
    Hydration,
    Protein,
    Recovery,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NutritionRecommendation {
    #[serde(rename = "type")]
    pub topic: NutritionTopic,
    pub message: String,
    pub priority: Priority,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NutritionAdvice {
    pub recommendations: Vec<NutritionRecommendation>,
}

/// Recommendations for today given today's check-in (if any) and the hour
///
/// Without a check-in the day reads as 0 water, low protein, no training.
pub fn nutrition_recommendations(today: Option<&CheckIn>, hour: u32) -> NutritionAdvice {
    let empty = CheckIn::default();
    let today = today.unwrap_or(&empty);
    let mut recommendations = Vec::new();

    let water = today.water_bottles_or(0);
    if water < HYDRATION_TRIGGER_BOTTLES {
        recommendations.push(NutritionRecommendation {
            topic: NutritionTopic::Hydration,
            message: format!(
                "Drink {} more bottles today",
                HYDRATION_TARGET_BOTTLES - water
            ),
            priority: Priority::High,
        });
    }

    if today.trained() && today.protein() == ProteinLevel::Low {
        recommendations.push(NutritionRecommendation {
            topic: NutritionTopic::Protein,
            message: "Post-workout protein needed - try chocolate milk or protein shake".into(),
            priority: Priority::High,
        });
    }

    if hour >= EVENING_HOUR {
        recommendations.push(NutritionRecommendation {
            topic: NutritionTopic::Recovery,
            message: "Consider light snack with protein for overnight recovery".into(),
            priority: Priority::Medium,
        });
    }

    NutritionAdvice { recommendations }
}
