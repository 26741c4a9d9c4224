use anyhow::Result;

/// Trait for text-completion providers (OpenRouter, fakes in tests, etc.)
///
/// A provider receives one user-role prompt and returns the model's free-form
/// answer. Timeouts and transport errors are the provider's business; callers
/// only see `Ok(text)` or an error.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
