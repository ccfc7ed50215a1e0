//! Поддельный провайдер для тестов: запоминает запросы и отвечает заданным
//! текстом, URL или ошибкой.

use crate::shared::llm::{ChatMessage, GeneratedImage, LlmError, LlmProvider, LlmResponse};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct FakeProvider {
    reply: Result<String, LlmError>,
    image_url: String,
    chat_calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    image_prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            image_url: "https://img.example/default.png".to_string(),
            chat_calls: Mutex::new(Vec::new()),
            image_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_image(url: &str) -> Self {
        Self {
            image_url: url.to_string(),
            ..Self::replying("")
        }
    }

    pub fn failing(err: LlmError) -> Self {
        Self {
            reply: Err(err),
            ..Self::replying("")
        }
    }

    pub fn chat_calls(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.chat_calls.lock().unwrap().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<LlmResponse, LlmError> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages));
        let content = self.reply.clone()?;
        Ok(LlmResponse {
            content,
            tokens_used: Some(1),
            model: model.to_string(),
            finish_reason: Some("Stop".to_string()),
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, LlmError> {
        self.image_prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()?;
        Ok(GeneratedImage {
            url: self.image_url.clone(),
        })
    }

    fn provider_name(&self) -> &str {
        "Fake"
    }
}
