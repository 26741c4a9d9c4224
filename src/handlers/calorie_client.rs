use crate::models::{CalorieRequest, CalorieResponse, ErrorResponse};

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    Busy,

    #[error("no submission is pending")]
    NotSubmitting,

    #[error("workout failed validation: {0}")]
    Invalid(#[from] crate::handlers::workout_form::ValidationErrors),

    #[error("could not reach calorie service: {0}")]
    Transport(String),

    #[error("calorie service returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Anything that can turn a workout into calories on the client's behalf.
#[async_trait::async_trait]
pub trait CalorieClient: Send + Sync {
    async fn calculate_calories(&self, request: &CalorieRequest) -> Result<u32, SubmissionError>;
}

/// Talks to `POST /api/calculate-calories` over HTTP.
pub struct HttpCalorieClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCalorieClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/calculate-calories", self.base_url)
    }
}

#[async_trait::async_trait]
impl CalorieClient for HttpCalorieClient {
    async fn calculate_calories(&self, request: &CalorieRequest) -> Result<u32, SubmissionError> {
        log::debug!("📤 POST {} for {}", self.endpoint(), request.exercise);

        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(SubmissionError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: CalorieResponse = response
            .json()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        Ok(body.calories)
    }
}
