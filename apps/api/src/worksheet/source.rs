//! Worksheet text source: pluggable, trait-based producer of worksheet Markdown.
//!
//! Default: `GeminiWorksheetSource` (calls the model through `LlmClient`).
//! `AppState` holds an `Arc<dyn WorksheetSource>`; tests swap in a canned source.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::worksheet::prompts::{build_system_prompt, build_user_prompt};

/// Body of `POST /process` and `POST /process/pdf`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorksheetRequest {
    pub topic: String,
    pub grade_level: u32,
}

impl WorksheetRequest {
    /// Trims the topic and rejects an empty one.
    pub fn validated(self) -> Result<Self, AppError> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("topic cannot be empty".to_string()));
        }
        Ok(Self {
            topic: topic.to_string(),
            grade_level: self.grade_level,
        })
    }
}

/// Produces the worksheet text for a request. The text is untrusted and may be empty.
#[async_trait]
pub trait WorksheetSource: Send + Sync {
    async fn generate(&self, request: &WorksheetRequest) -> Result<String, AppError>;
}

pub struct GeminiWorksheetSource {
    llm: LlmClient,
}

impl GeminiWorksheetSource {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl WorksheetSource for GeminiWorksheetSource {
    async fn generate(&self, request: &WorksheetRequest) -> Result<String, AppError> {
        let system = build_system_prompt(&request.topic, request.grade_level);
        let prompt = build_user_prompt(&request.topic, request.grade_level);
        Ok(self.llm.call_text(&prompt, &system).await?)
    }
}
