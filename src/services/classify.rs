// src/services/classify.rs

//! Entry classification through a chat-completion endpoint.
//!
//! Classification is strictly best-effort: any failure degrades to the
//! fallback label so the ingestion run is never aborted by this service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ClassifierConfig;

/// Label substituted whenever classification fails.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Assigns a category label to an entry.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify an entry. Infallible by contract: implementations must
    /// return a fallback label rather than propagate an error.
    async fn classify(&self, title: &str, summary: &str) -> String;
}

/// Chat-completions request message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat-completions request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Chat-completions response choice message
#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions response choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

/// Chat-completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Classifier backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClassifier {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiClassifier {
    /// Create a classifier from configuration.
    pub fn new(client: Client, config: &ClassifierConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Ask the endpoint for a category label.
    async fn request_category(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::classification(format!(
                "completion endpoint returned HTTP {status}"
            )));
        }

        let body: ChatResponse = response.json().await?;
        extract_label(body)
            .ok_or_else(|| AppError::classification("completion response had no content"))
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, title: &str, summary: &str) -> String {
        let prompt = format!("Classify this news article into a category: {title}\n{summary}");

        match self.request_category(&prompt).await {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!("Classification failed, using fallback label: {e}");
                FALLBACK_CATEGORY.to_string()
            }
        }
    }
}

/// Pull the trimmed label out of a completion response.
fn extract_label(response: ChatResponse) -> Option<String> {
    let content = response.choices.into_iter().next()?.message.content?;
    let label = content.trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(json: &str) -> ChatResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_label_from_completion() {
        let response = response_from(
            r#"{"choices":[{"message":{"role":"assistant","content":" Tech \n"}}]}"#,
        );
        assert_eq!(extract_label(response), Some("Tech".to_string()));
    }

    #[test]
    fn test_extract_label_rejects_empty_choices() {
        let response = response_from(r#"{"choices":[]}"#);
        assert_eq!(extract_label(response), None);
    }

    #[test]
    fn test_extract_label_rejects_blank_content() {
        let response = response_from(r#"{"choices":[{"message":{"content":"   "}}]}"#);
        assert_eq!(extract_label(response), None);
    }

    #[test]
    fn test_extract_label_rejects_missing_content() {
        let response = response_from(r#"{"choices":[{"message":{}}]}"#);
        assert_eq!(extract_label(response), None);
    }
}
