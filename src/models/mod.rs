use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl Intensity {
    /// Form values are matched exactly, no case folding.
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Intensity::Low),
            "medium" => Some(Intensity::Medium),
            "high" => Some(Intensity::High),
            _ => None,
        }
    }
}

/// A validated workout, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutInput {
    pub exercise: String,
    pub duration: u32, // minutes, always >= 1
    pub intensity: Intensity,
    pub date: NaiveDate,
}

/// A workout together with its calorie estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub workout: WorkoutInput,
    pub calories: u32,
}

/// Body of `POST /api/calculate-calories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieRequest {
    pub exercise: String,
    pub duration: u32,
    pub intensity: Intensity,
}

impl From<&WorkoutInput> for CalorieRequest {
    fn from(input: &WorkoutInput) -> Self {
        Self {
            exercise: input.exercise.clone(),
            duration: input.duration,
            intensity: input.intensity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieResponse {
    pub calories: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
