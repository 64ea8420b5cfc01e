use serde::{Deserialize, Serialize};

use super::Message;

/// Output format requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmResponseFormat {
    #[default]
    Text,
    /// The model must reply with a single JSON object
    JsonObject,
}

/// Parameters for LLM generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub response_format: LlmResponseFormat,
}

impl LlmRequest {
    pub fn builder() -> LlmRequestBuilder {
        LlmRequestBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct LlmRequestBuilder {
    messages: Vec<Message>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    response_format: LlmResponseFormat,
}

impl LlmRequestBuilder {
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(Message::system(content))
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(Message::user(content))
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn json_output(mut self) -> Self {
        self.response_format = LlmResponseFormat::JsonObject;
        self
    }

    pub fn build(self) -> LlmRequest {
        LlmRequest {
            messages: self.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: self.response_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = LlmRequest::builder()
            .system("You are a support agent")
            .user("Hello!")
            .temperature(0.2)
            .json_output()
            .build();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, None);
        assert_eq!(request.response_format, LlmResponseFormat::JsonObject);
    }
}
