pub mod calorie_client;
pub mod workout_form;

pub use calorie_client::{CalorieClient, HttpCalorieClient, SubmissionError};
pub use workout_form::{
    Field, FormState, ValidationError, ValidationErrors, WorkoutForm, WorkoutFormController,
};
