use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ai::{AiError, ChatTurn, Tutor};
use crate::config::AiConfig;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint
pub struct AiClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    /// Call the chat-completions API and return the first choice's text
    async fn complete(&self, messages: Vec<ChatMessage<'_>>) -> Result<String, AiError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://codefuture.dev")
            .header("X-Title", "CodeFuture")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_completion(status, &body)
    }

    async fn prompt(&self, prompt: &str) -> Result<String, AiError> {
        self.complete(vec![ChatMessage { role: "user", content: prompt }]).await
    }
}

#[async_trait]
impl Tutor for AiClient {
    async fn generate_lesson_plan(&self, persona: &str, goals: &str) -> Result<String, AiError> {
        let prompt = format!(
            r#"Create a curriculum outline for a user with the persona: {persona}.
Their specific goal is: "{goals}".

Generate a valid JSON object with the following structure:
{{
  "title": "Course Title",
  "description": "Short description",
  "language": "python or javascript",
  "lessons": [
    {{ "id": "1", "title": "Lesson Title", "content": "2-3 sentence explanation", "initialCode": "starter code" }}
  ]
}}
Provide ONLY the JSON. Generate 3-5 lessons."#
        );

        let content = extract_json(&self.prompt(&prompt).await?).to_string();
        tracing::info!("✅ Generated lesson plan for persona {}", persona);
        Ok(content)
    }

    async fn generate_roadmap(
        &self,
        role: &str,
        experience: &str,
        goal: &str,
        other: &str,
    ) -> Result<String, AiError> {
        let prompt = format!(
            r#"Design a step-by-step learning roadmap.
Current role: {role}
Experience level: {experience}
Goal: {goal}
Other notes: {other}

Return a valid JSON object:
{{
  "title": "Roadmap title",
  "description": "Short description",
  "lessons": [
    {{ "id": "1", "title": "Lesson title", "summary": "What is covered", "duration": "e.g. 2 hours" }}
  ]
}}
Provide ONLY the JSON. Generate 6-10 lessons in learning order."#
        );

        let content = extract_json(&self.prompt(&prompt).await?).to_string();
        tracing::info!("✅ Generated roadmap for role {} ({})", role, experience);
        Ok(content)
    }

    async fn chat(
        &self,
        persona: &str,
        current_code: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AiError> {
        let context = format!(
            "Current Code in Editor:\n```\n{current_code}\n```\n\nUser Message: {message}"
        );

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage { role: "system", content: system_instruction(persona) });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: history_role(&turn.role),
            content: &turn.text,
        }));
        messages.push(ChatMessage { role: "user", content: &context });

        self.complete(messages).await
    }

    async fn execute_code(&self, code: &str, language: &str) -> Result<String, AiError> {
        let prompt = format!(
            r#"Act as a {language} interpreter.
Execute the following code and return ONLY the output (stdout).
If there is an error, return the error message as the interpreter would.
Do not provide any conversational text, just the execution result.

Code:
{code}"#
        );

        self.prompt(&prompt).await
    }

    async fn draft_contact_reply(&self, first_name: &str, message: &str) -> Result<String, AiError> {
        let prompt = format!(
            "Write a short, friendly support reply (under 120 words) to {first_name}, \
             who wrote to a coding education platform:\n\n{message}"
        );

        self.prompt(&prompt).await
    }
}

/// Interpret a chat-completions reply
fn parse_completion(status: StatusCode, body: &str) -> Result<String, AiError> {
    let parsed: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => {
            return Err(AiError::Api { status: status.as_u16(), body: body.to_string() });
        }
        Err(e) => return Err(AiError::Provider(format!("failed to parse response: {}", e))),
    };

    if let Some(error) = parsed.error {
        return Err(AiError::Provider(error.message));
    }
    if !status.is_success() {
        return Err(AiError::Api { status: status.as_u16(), body: body.to_string() });
    }

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(AiError::EmptyResponse)
}

/// Strip a surrounding markdown code fence, e.g. ```json ... ```
pub fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let Some((_, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn system_instruction(persona: &str) -> &'static str {
    match persona {
        "kid" => "You are a friendly and visual coding tutor for a visual learner. Use clear analogies, keep explanations short and avoid unexplained jargon.",
        "doctor_engineer" => "You are a solution-focused technical consultant for a domain expert. Focus on practical automation and show how code solves real problems.",
        "professional" => "You are a senior developer mentor. Focus on best practices, clean code and industry-standard tools. Be concise.",
        _ => "You are a helpful and patient coding tutor.",
    }
}

/// Frontends send "model" for assistant turns
fn history_role(role: &str) -> &'static str {
    match role {
        "model" | "assistant" => "assistant",
        _ => "user",
    }
}
