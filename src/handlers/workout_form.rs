use chrono::NaiveDate;

use crate::handlers::calorie_client::{CalorieClient, SubmissionError};
use crate::models::{CalorieRequest, Intensity, WorkoutInput, WorkoutRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Exercise,
    Duration,
    Intensity,
    Date,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::Exercise => "exercise",
            Field::Duration => "duration",
            Field::Intensity => "intensity",
            Field::Date => "date",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

/// Every field that failed, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Message to show next to `field`, if it failed.
    pub fn field(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw form fields, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct WorkoutForm {
    pub exercise: String,
    pub duration: String,
    pub intensity: String,
    pub date: String, // YYYY-MM-DD
}

impl WorkoutForm {
    pub fn validate(&self) -> Result<WorkoutInput, ValidationErrors> {
        let mut errors = Vec::new();
        let mut fail = |field, message: &str| {
            errors.push(ValidationError {
                field,
                message: message.to_string(),
            })
        };

        let exercise = self.exercise.trim();
        if exercise.is_empty() {
            fail(Field::Exercise, "Exercise name is required");
        }

        let duration = match self.duration.trim().parse::<u32>() {
            Ok(0) => {
                fail(Field::Duration, "Duration must be at least 1 minute");
                None
            }
            Ok(d) => Some(d),
            Err(_) => {
                fail(Field::Duration, "Duration must be a whole number of minutes");
                None
            }
        };

        let intensity = Intensity::from_string(&self.intensity);
        if intensity.is_none() {
            fail(Field::Intensity, "Please select an intensity level");
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok();
        if date.is_none() {
            fail(Field::Date, "Please enter a valid date");
        }

        match (duration, intensity, date) {
            (Some(duration), Some(intensity), Some(date)) if errors.is_empty() => Ok(WorkoutInput {
                exercise: exercise.to_string(),
                duration,
                intensity,
                date,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
}

/// Puts the form back to `Idle` if a pending request is dropped before it completes.
struct PendingSubmission<'a> {
    state: &'a mut FormState,
    settled: bool,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("⚠️ Pending submission dropped, form is idle again");
            *self.state = FormState::Idle;
        }
    }
}

/// Client-side workout form: validation, submission and session history.
///
/// History is append-only and lives as long as the controller does.
pub struct WorkoutFormController<C: CalorieClient> {
    client: C,
    state: FormState,
    history: Vec<WorkoutRecord>,
    last_calories: Option<u32>,
}

impl<C: CalorieClient> WorkoutFormController<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: FormState::Idle,
            history: Vec::new(),
            last_calories: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// While true the submit button stays disabled.
    pub fn is_busy(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn history(&self) -> &[WorkoutRecord] {
        &self.history
    }

    pub fn total_workouts(&self) -> usize {
        self.history.len()
    }

    pub fn total_calories(&self) -> u64 {
        self.history.iter().map(|r| u64::from(r.calories)).sum()
    }

    /// Calories of the latest submission, unset after a failure.
    pub fn last_calories(&self) -> Option<u32> {
        self.last_calories
    }

    pub fn begin_submission(&mut self, input: &WorkoutInput) -> Result<CalorieRequest, SubmissionError> {
        if self.is_busy() {
            log::warn!("⚠️ Ignoring submission of {} while another is pending", input.exercise);
            return Err(SubmissionError::Busy);
        }
        self.state = FormState::Submitting;
        Ok(CalorieRequest::from(input))
    }

    pub fn complete_submission(
        &mut self,
        input: WorkoutInput,
        outcome: Result<u32, SubmissionError>,
    ) -> Result<&WorkoutRecord, SubmissionError> {
        if !self.is_busy() {
            log::warn!("⚠️ Ignoring result for {}, no submission is pending", input.exercise);
            return Err(SubmissionError::NotSubmitting);
        }
        self.state = FormState::Idle;

        match outcome {
            Ok(calories) => {
                self.last_calories = Some(calories);
                self.history.push(WorkoutRecord {
                    workout: input,
                    calories,
                });
                log::info!(
                    "✅ Logged workout #{} ({} kcal, {} kcal total)",
                    self.total_workouts(),
                    calories,
                    self.total_calories()
                );
                Ok(&self.history[self.history.len() - 1])
            }
            Err(e) => {
                self.last_calories = None;
                log::error!("❌ Failed to calculate calories for {}: {}", input.exercise, e);
                Err(e)
            }
        }
    }

    pub async fn submit(&mut self, input: WorkoutInput) -> Result<&WorkoutRecord, SubmissionError> {
        let request = self.begin_submission(&input)?;

        let mut pending = PendingSubmission {
            state: &mut self.state,
            settled: false,
        };
        let outcome = self.client.calculate_calories(&request).await;
        pending.settled = true;
        drop(pending);

        self.complete_submission(input, outcome)
    }

    /// Validates first; an invalid form never reaches the client.
    pub async fn submit_form(&mut self, form: &WorkoutForm) -> Result<&WorkoutRecord, SubmissionError> {
        let input = form.validate()?;
        self.submit(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays queued outcomes in order.
    struct ScriptedClient {
        outcomes: Mutex<VecDeque<Result<u32, SubmissionError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(outcomes: Vec<Result<u32, SubmissionError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl CalorieClient for ScriptedClient {
        async fn calculate_calories(&self, _request: &CalorieRequest) -> Result<u32, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(SubmissionError::Transport("no scripted outcome".to_string())))
        }
    }

    fn form(exercise: &str, duration: &str, intensity: &str, date: &str) -> WorkoutForm {
        WorkoutForm {
            exercise: exercise.to_string(),
            duration: duration.to_string(),
            intensity: intensity.to_string(),
            date: date.to_string(),
        }
    }

    fn running() -> WorkoutInput {
        form("Running", "30", "medium", "2024-01-01").validate().unwrap()
    }

    #[test]
    fn test_validate_accepts_valid_form() {
        let input = form("  Running ", "30", "medium", "2024-01-01").validate().unwrap();

        assert_eq!(input.exercise, "Running");
        assert_eq!(input.duration, 30);
        assert_eq!(input.intensity, Intensity::Medium);
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_validate_accepts_every_intensity() {
        for (value, expected) in [
            ("low", Intensity::Low),
            ("medium", Intensity::Medium),
            ("high", Intensity::High),
        ] {
            let input = form("Yoga", "1", value, "2024-02-29").validate().unwrap();
            assert_eq!(input.intensity, expected);
        }
    }

    #[test]
    fn test_validate_rejects_empty_exercise() {
        let errors = form("   ", "30", "low", "2024-01-01").validate().unwrap_err();

        assert_eq!(errors.fields(), vec![Field::Exercise]);
        assert_eq!(errors.field(Field::Exercise), Some("Exercise name is required"));
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        for duration in ["0", "-5", "abc", "", "12.5"] {
            let errors = form("Running", duration, "low", "2024-01-01").validate().unwrap_err();
            assert_eq!(errors.fields(), vec![Field::Duration], "duration {:?}", duration);
        }
    }

    #[test]
    fn test_duration_messages() {
        let errors = form("Running", "0", "low", "2024-01-01").validate().unwrap_err();
        assert_eq!(errors.field(Field::Duration), Some("Duration must be at least 1 minute"));

        for duration in ["4294967296", "abc", "-5"] {
            let errors = form("Running", duration, "low", "2024-01-01").validate().unwrap_err();
            assert_eq!(
                errors.field(Field::Duration),
                Some("Duration must be a whole number of minutes"),
                "duration {:?}",
                duration
            );
        }
    }

    #[test]
    fn test_validate_rejects_unknown_intensity() {
        let errors = form("Running", "30", "extreme", "2024-01-01").validate().unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Intensity]);

        let errors = form("Running", "30", "Medium", "2024-01-01").validate().unwrap_err();
        assert_eq!(errors.fields(), vec![Field::Intensity]);
    }

    #[test]
    fn test_validate_rejects_invalid_date() {
        for date in ["2024-02-30", "2023-02-29", "01/01/2024", ""] {
            let errors = form("Running", "30", "low", date).validate().unwrap_err();
            assert_eq!(errors.fields(), vec![Field::Date], "date {:?}", date);
        }
    }

    #[test]
    fn test_validate_reports_every_failing_field() {
        let errors = form("", "0", "", "nope").validate().unwrap_err();

        assert_eq!(
            errors.fields(),
            vec![Field::Exercise, Field::Duration, Field::Intensity, Field::Date]
        );
        assert!(errors.to_string().contains("duration: Duration must be at least 1 minute"));
    }

    #[tokio::test]
    async fn test_zero_duration_never_calls_client() {
        let mut controller = WorkoutFormController::new(ScriptedClient::new(vec![Ok(300)]));

        let err = controller
            .submit_form(&form("Running", "0", "medium", "2024-01-01"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Invalid(_)));
        assert_eq!(controller.client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.total_workouts(), 0);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_two_submissions_accumulate_totals() {
        let mut controller = WorkoutFormController::new(ScriptedClient::new(vec![Ok(300), Ok(300)]));
        let running = form("Running", "30", "medium", "2024-01-01");

        let record = controller.submit_form(&running).await.unwrap();
        assert_eq!(record.calories, 300);
        controller.submit_form(&running).await.unwrap();

        assert_eq!(controller.total_workouts(), 2);
        assert_eq!(controller.total_calories(), 600);
        assert_eq!(controller.last_calories(), Some(300));
    }

    #[tokio::test]
    async fn test_history_keeps_completion_order() {
        let mut controller = WorkoutFormController::new(ScriptedClient::new(vec![
            Ok(120),
            Err(SubmissionError::Status {
                status: 500,
                message: "Failed to calculate calories".to_string(),
            }),
            Ok(450),
        ]));

        controller
            .submit_form(&form("Walking", "40", "low", "2024-03-05"))
            .await
            .unwrap();
        let err = controller
            .submit_form(&form("Boxing", "20", "high", "2024-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Status { status: 500, .. }));
        assert_eq!(controller.last_calories(), None);
        assert_eq!(controller.total_workouts(), 1);
        assert_eq!(controller.total_calories(), 120);

        controller
            .submit_form(&form("Rowing", "25", "high", "2024-01-15"))
            .await
            .unwrap();

        let exercises: Vec<&str> = controller
            .history()
            .iter()
            .map(|r| r.workout.exercise.as_str())
            .collect();
        assert_eq!(exercises, vec!["Walking", "Rowing"]);
        assert_eq!(controller.total_calories(), 570);
        assert_eq!(controller.state(), FormState::Idle);
    }

    #[test]
    fn test_busy_state_blocks_resubmission() {
        let mut controller = WorkoutFormController::new(ScriptedClient::new(vec![]));
        let input = running();

        let request = controller.begin_submission(&input).unwrap();
        assert_eq!(request.exercise, "Running");
        assert!(controller.is_busy());
        assert!(matches!(
            controller.begin_submission(&input),
            Err(SubmissionError::Busy)
        ));

        let record = controller.complete_submission(input.clone(), Ok(310)).unwrap();
        assert_eq!(record.calories, 310);
        assert_eq!(record.workout, input);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_failed_submission_clears_busy_without_record() {
        let mut controller = WorkoutFormController::new(ScriptedClient::new(vec![]));
        let input = running();

        controller.begin_submission(&input).unwrap();
        let err = controller
            .complete_submission(input, Err(SubmissionError::Transport("timeout".to_string())))
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Transport(_)));
        assert_eq!(controller.state(), FormState::Idle);
        assert!(controller.history().is_empty());
        assert_eq!(controller.total_calories(), 0);
    }

    #[tokio::test]
    async fn test_totals_match_sum_of_calories() {
        let calories = vec![0, 1, 250, 999, 4000];
        let outcomes: Vec<Result<u32, SubmissionError>> = calories.iter().map(|c| Ok(*c)).collect();
        let mut controller = WorkoutFormController::new(ScriptedClient::new(outcomes));

        for _ in &calories {
            controller.submit(running()).await.unwrap();
        }

        assert_eq!(controller.total_workouts(), calories.len());
        assert_eq!(
            controller.total_calories(),
            calories.iter().map(|c| u64::from(*c)).sum::<u64>()
        );
    }

    /// Never answers the first request; later requests get 300.
    struct StallingClient {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CalorieClient for StallingClient {
        async fn calculate_calories(&self, _request: &CalorieRequest) -> Result<u32, SubmissionError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(300)
        }
    }

    #[tokio::test]
    async fn test_dropped_submission_returns_to_idle() {
        let mut controller = WorkoutFormController::new(StallingClient {
            calls: AtomicUsize::new(0),
        });

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit(running()),
        )
        .await;
        assert!(timed_out.is_err());

        assert_eq!(controller.state(), FormState::Idle);
        assert!(controller.history().is_empty());

        let record = controller.submit(running()).await.unwrap();
        assert_eq!(record.calories, 300);
        assert_eq!(controller.total_workouts(), 1);
    }

    #[test]
    fn test_complete_without_begin_is_rejected() {
        let mut controller = WorkoutFormController::new(ScriptedClient::new(vec![]));

        let err = controller.complete_submission(running(), Ok(500)).unwrap_err();

        assert!(matches!(err, SubmissionError::NotSubmitting));
        assert!(controller.history().is_empty());
        assert_eq!(controller.last_calories(), None);
        assert_eq!(controller.state(), FormState::Idle);
    }
}
