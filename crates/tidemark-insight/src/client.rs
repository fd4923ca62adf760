//! Chat-completions client that requests JSON-mode responses.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::InsightError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// HTTP client for a chat-completions endpoint.
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl ChatClient {
    /// Create a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, InsightError> {
        Self::with_base_url(api_key, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API base (for testing with wiremock).
    ///
    /// `base_url` is the API root; `/chat/completions` is appended.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`InsightError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let raw = format!("{}/chat/completions", base_url.trim().trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|e| InsightError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    /// Send one user prompt and return the raw JSON text of the reply.
    ///
    /// No retries: callers own the failure policy.
    ///
    /// # Errors
    ///
    /// - [`InsightError::Api`] on a non-2xx status.
    /// - [`InsightError::Http`] on network failure.
    /// - [`InsightError::Deserialize`] if the envelope does not parse.
    /// - [`InsightError::EmptyResponse`] if there is no choice or its content is blank.
    pub async fn complete_json(&self, prompt: &str) -> Result<String, InsightError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(InsightError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| InsightError::Deserialize {
                context: "chat completion envelope".to_string(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InsightError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_chat_completions_path() {
        let client = ChatClient::with_base_url("k", "gpt-4o", 30, "ua", "http://localhost:8080/v1/")
            .expect("client construction should not fail");
        assert_eq!(
            client.endpoint.as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ChatClient::with_base_url("k", "gpt-4o", 30, "ua", "::not a url::");
        assert!(matches!(result, Err(InsightError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn request_serializes_json_mode() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: [Message {
                role: "user",
                content: "hello",
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["model"], "gpt-4o");
    }
}
