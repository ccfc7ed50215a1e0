use super::types::{ChatMessage, GeneratedImage, LlmError, LlmProvider, LlmResponse};
use crate::shared::config::Config;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI провайдер
///
/// Чат идёт через `async-openai`, генерация изображений через обычный
/// `reqwest` POST на `/images/generations` того же endpoint.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    max_tokens: u32,
    timeout: Option<Duration>,
    image_size: String,
    image_model: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenAiProvider {
    /// Создать провайдер из конфигурации (endpoint может быть совместимым API)
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key = config.llm.api_key.clone().unwrap_or_default();
        let api_base = config.llm.api_base.trim_end_matches('/').to_string();

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(api_base.clone());
        // ошибки провайдера сразу уходят клиенту, без повторных попыток
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retry);

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = config.llm.timeout() {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            http,
            api_base,
            api_key,
            max_tokens: config.llm.max_tokens,
            timeout: config.llm.timeout(),
            image_size: config.image.size.clone(),
            image_model: config.image.model.clone(),
        })
    }

    /// Конвертировать наши сообщения в пользовательские сообщения OpenAI
    fn convert_messages(
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let mut openai_messages = Vec::with_capacity(messages.len());

        for msg in messages {
            let openai_msg = ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content)
                .build()
                .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                .into();
            openai_messages.push(openai_msg);
        }

        Ok(openai_messages)
    }

    fn classify_openai_error(err: OpenAIError) -> LlmError {
        match err {
            OpenAIError::ApiError(api) => {
                let code = format!("{:?}", api.code);
                let kind = format!("{:?}", api.r#type);
                if code.contains("invalid_api_key") || kind.contains("authentication_error") {
                    LlmError::AuthError(api.message)
                } else if code.contains("rate_limit_exceeded") || code.contains("insufficient_quota")
                {
                    LlmError::RateLimitExceeded(api.message)
                } else {
                    LlmError::ApiError(api.message)
                }
            }
            OpenAIError::Reqwest(e) => LlmError::NetworkError(e.to_string()),
            other => {
                let err_str = other.to_string();
                if err_str.contains("401") || err_str.contains("authentication") {
                    LlmError::AuthError(err_str)
                } else if err_str.contains("429") || err_str.contains("rate limit") {
                    LlmError::RateLimitExceeded(err_str)
                } else {
                    LlmError::ApiError(err_str)
                }
            }
        }
    }

    fn classify_http_status(status: reqwest::StatusCode, message: String) -> LlmError {
        match status.as_u16() {
            401 | 403 => LlmError::AuthError(message),
            429 => LlmError::RateLimitExceeded(message),
            400 | 404 | 422 => LlmError::InvalidRequest(message),
            _ => LlmError::ApiError(message),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<LlmResponse, LlmError> {
        let openai_messages = Self::convert_messages(messages)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(openai_messages)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let chat = self.client.chat();
        let call = chat.create(request);
        let response = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                LlmError::NetworkError(format!("no response within {}s", timeout.as_secs()))
            })?,
            None => call.await,
        }
        .map_err(Self::classify_openai_error)?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::EmptyResponse("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.clone().unwrap_or_default(),
            tokens_used: response.usage.as_ref().map(|u| u.total_tokens),
            model: response.model.clone(),
            finish_reason: choice.finish_reason.as_ref().map(|r| format!("{:?}", r)),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, LlmError> {
        let url = format!("{}/images/generations", self.api_base);
        let body = ImageGenerationRequest {
            model: self.image_model.as_deref(),
            prompt,
            n: 1,
            size: &self.image_size,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| format!("{} {}", status, text));
            return Err(Self::classify_http_status(status, message));
        }

        let parsed: ImageGenerationResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::ApiError(format!("Failed to parse image response: {}", e)))?;

        parsed
            .data
            .into_iter()
            .find_map(|d| d.url)
            .map(|url| GeneratedImage { url })
            .ok_or_else(|| LlmError::EmptyResponse("No image URL in response".to_string()))
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, max_tokens: u32) -> OpenAiProvider {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.api_base = format!("{}/v1", server.uri());
        config.llm.max_tokens = max_tokens;
        OpenAiProvider::from_config(&config).unwrap()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop",
                "logprobs": null
            }],
            "usage": { "prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8 }
        })
    }

    #[test]
    fn test_convert_messages_keeps_order() {
        let messages = vec![ChatMessage::user("Summarize"), ChatMessage::user("foo\n")];
        let converted = OpenAiProvider::convert_messages(messages).unwrap();
        assert_eq!(converted.len(), 2);
        assert!(converted
            .iter()
            .all(|m| matches!(m, ChatCompletionRequestMessage::User(_))));

        let json = serde_json::to_value(&converted).unwrap();
        assert_eq!(json[0]["content"], "Summarize");
        assert_eq!(json[1]["content"], "foo\n");
    }

    #[tokio::test]
    async fn test_chat_completion_sends_model_and_token_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "max_completion_tokens": 150,
                "messages": [{ "role": "user", "content": "Say hi" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("  Hi there!  \n")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 150);
        let response = provider
            .chat_completion("gpt-4", vec![ChatMessage::user("Say hi")])
            .await
            .unwrap();

        // провайдер не обрезает текст, это делает relay
        assert_eq!(response.content, "  Hi there!  \n");
        assert_eq!(response.tokens_used, Some(8));
        assert_eq!(response.model, "gpt-4");
    }

    #[tokio::test]
    async fn test_chat_completion_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Incorrect API key provided",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, 4000);
        let err = provider
            .chat_completion("gpt-4", vec![ChatMessage::user("Say hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::AuthError(_)));
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_generate_image_requests_single_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "prompt": "a cat",
                "n": 1,
                "size": "1024x1024"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1700000000,
                "data": [{ "url": "https://img.example/cat.png" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 4000);
        let image = provider.generate_image("a cat").await.unwrap();
        assert_eq!(image.url, "https://img.example/cat.png");
    }

    #[tokio::test]
    async fn test_generate_image_passes_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Your request was rejected by the safety system" }
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, 4000);
        let err = provider.generate_image("something").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidRequest(_)));
        assert!(err
            .to_string()
            .contains("Your request was rejected by the safety system"));
    }

    #[tokio::test]
    async fn test_generate_image_without_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, 4000);
        let err = provider.generate_image("a cat").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(_)));
    }

    fn api_error_body(message: &str, kind: &str, code: &str) -> serde_json::Value {
        json!({
            "error": { "message": message, "type": kind, "param": null, "code": code }
        })
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(api_error_body(
                "The server had an error while processing your request",
                "server_error",
                "server_error",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 4000);
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            provider.chat_completion("gpt-4", vec![ChatMessage::user("Say hi")]),
        )
        .await
        .expect("provider kept retrying");

        let err = result.unwrap_err();
        assert!(matches!(err, LlmError::ApiError(_)));
        assert!(err.to_string().contains("The server had an error"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(api_error_body(
                "Rate limit reached for gpt-4",
                "requests",
                "rate_limit_exceeded",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, 4000);
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            provider.chat_completion("gpt-4", vec![ChatMessage::user("Say hi")]),
        )
        .await
        .expect("provider kept retrying");

        let err = result.unwrap_err();
        assert!(matches!(err, LlmError::RateLimitExceeded(_)));
        assert!(err.to_string().contains("Rate limit reached for gpt-4"));
    }

    #[tokio::test]
    async fn test_generate_image_passes_size_and_model_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_json(json!({
                "model": "flux-schnell",
                "prompt": "a lighthouse",
                "n": 1,
                "size": "1344x768"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "url": "https://img.example/lighthouse.png" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.api_base = format!("{}/v1", server.uri());
        config.image.size = "1344x768".to_string();
        config.image.model = Some("flux-schnell".to_string());
        let provider = OpenAiProvider::from_config(&config).unwrap();

        let image = provider.generate_image("a lighthouse").await.unwrap();
        assert_eq!(image.url, "https://img.example/lighthouse.png");
    }
}
