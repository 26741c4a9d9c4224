use std::sync::Arc;

use crate::models::Intensity;
use crate::services::CompletionService;

/// Body weight every estimate is normalised to.
pub const REFERENCE_WEIGHT_KG: u32 = 70;

#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("no calorie figure in model response: {0:?}")]
    Unparseable(String),
}

/// Turns a workout description into a calorie figure by asking a language model.
///
/// Every call reaches the completion provider; nothing is cached.
pub struct CalorieEstimator {
    completion: Arc<dyn CompletionService>,
}

impl CalorieEstimator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    pub async fn estimate(
        &self,
        exercise: &str,
        duration: u32,
        intensity: Intensity,
    ) -> Result<u32, EstimationError> {
        let prompt = build_prompt(exercise, duration, intensity);
        log::debug!("📝 Calorie prompt: {}", prompt);

        let text = self
            .completion
            .complete(&prompt)
            .await
            .map_err(|e| EstimationError::Completion(format!("{:#}", e)))?;

        let calories = extract_calories(&text)?;
        log::info!(
            "🔥 Estimated {} kcal for {} min of {} ({})",
            calories,
            duration,
            exercise,
            intensity
        );
        Ok(calories)
    }
}

pub fn build_prompt(exercise: &str, duration: u32, intensity: Intensity) -> String {
    format!(
        "Calculate the approximate calories burned for the following exercise:\n\
         Exercise: {}\n\
         Duration: {} minutes\n\
         Intensity: {}\n\
         Assume a body weight of {} kg. \
         Respond with only a single number representing the calories burned.",
        exercise, duration, intensity, REFERENCE_WEIGHT_KG
    )
}

/// Keeps every ASCII digit in `text` and reads them as one integer.
///
/// Digits anywhere in the answer count, so "burns 2x 150" yields 2150.
pub fn extract_calories(text: &str) -> Result<u32, EstimationError> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();

    digits.parse::<u32>().map_err(|_| {
        log::warn!("⚠️ Could not parse calories from response: {:?}", text);
        EstimationError::Unparseable(text.to_string())
    })
}
