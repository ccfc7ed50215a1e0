use crate::shared::config::UnsupportedPolicy;
use crate::shared::extraction::{self, ExtractionError};
use crate::shared::llm::{ChatMessage, LlmError, LlmProvider};
use crate::shared::uploads::ChatForm;
use contracts::domain::a001_chat::ChatResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Собрать сообщения для провайдера.
///
/// Всегда одно сообщение с промптом; текст вложений идёт вторым сообщением,
/// только если он непустой. Ни системного промпта, ни истории.
pub fn build_messages(prompt: &str, extracted: &str) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::user(prompt)];
    if !extracted.is_empty() {
        messages.push(ChatMessage::user(extracted));
    }
    messages
}

/// Отправить промпт выбранной модели и вернуть текст первого ответа без
/// пробелов по краям
pub async fn complete(
    provider: &dyn LlmProvider,
    model: &str,
    prompt: &str,
    extracted: &str,
) -> Result<String, LlmError> {
    let messages = build_messages(prompt, extracted);
    let response = provider.chat_completion(model, messages).await?;

    tracing::info!(
        "{} response: model={}, tokens={:?}, finish_reason={:?}",
        provider.provider_name(),
        response.model,
        response.tokens_used,
        response.finish_reason
    );

    Ok(response.content.trim().to_string())
}

/// Полный проход: извлечь текст вложений (если они есть) и получить ответ
pub async fn send(
    provider: &dyn LlmProvider,
    policy: UnsupportedPolicy,
    form: &ChatForm,
) -> Result<ChatResponse, ChatError> {
    tracing::info!("Received prompt: {}", form.prompt);
    tracing::info!("Selected model: {}", form.model);

    let extracted = if form.uploads.is_empty() {
        String::new()
    } else {
        let text = extraction::extract_all(&form.uploads, policy).await?;
        tracing::debug!(
            "Extracted {} chars from {} file(s)",
            text.chars().count(),
            form.uploads.len()
        );
        text
    };

    let response = complete(provider, &form.model, &form.prompt, &extracted).await?;
    Ok(ChatResponse::new(response))
}
