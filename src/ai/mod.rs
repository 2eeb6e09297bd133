//! # AI Module
//!
//! The generative-text collaborator. Handlers depend on the [`Tutor`] trait;
//! [`AiClient`] is the chat-completions implementation used in production.

pub mod ai_client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ai_client::AiClient;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("AI provider error: {0}")]
    Provider(String),

    #[error("no response from AI")]
    EmptyResponse,
}

/// One prior turn of a tutor conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub text: String,
}

#[async_trait]
pub trait Tutor: Send + Sync {
    /// Curriculum outline as a JSON document
    async fn generate_lesson_plan(&self, persona: &str, goals: &str) -> Result<String, AiError>;

    /// Full roadmap as a JSON document
    async fn generate_roadmap(
        &self,
        role: &str,
        experience: &str,
        goal: &str,
        other: &str,
    ) -> Result<String, AiError>;

    async fn chat(
        &self,
        persona: &str,
        current_code: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AiError>;

    /// Simulated interpreter output for `code`
    async fn execute_code(&self, code: &str, language: &str) -> Result<String, AiError>;

    /// Suggested support reply for a contact form message
    async fn draft_contact_reply(&self, first_name: &str, message: &str) -> Result<String, AiError>;
}
