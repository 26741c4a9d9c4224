pub mod ai_service;
pub mod calorie_estimator;
pub mod openrouter; // OpenRouter AI service

pub use ai_service::CompletionService;
pub use calorie_estimator::{CalorieEstimator, EstimationError};
pub use openrouter::OpenRouterService;
