use crate::shared::llm::{LlmError, LlmProvider};
use contracts::domain::a002_image::ImageResponse;

/// Сгенерировать одно изображение и вернуть его URL как есть
pub async fn generate(provider: &dyn LlmProvider, prompt: &str) -> Result<ImageResponse, LlmError> {
    tracing::info!("Received image generation prompt: {}", prompt);

    let image = provider.generate_image(prompt).await?;
    tracing::info!("{} image generated: {}", provider.provider_name(), image.url);

    Ok(ImageResponse {
        image_url: image.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeProvider;

    #[tokio::test]
    async fn test_url_returned_verbatim() {
        let provider = FakeProvider::with_image("https://img.example/cat.png?sig=a%20b");
        let response = generate(&provider, "a cat").await.unwrap();
        assert_eq!(response.image_url, "https://img.example/cat.png?sig=a%20b");
        assert_eq!(provider.image_prompts(), vec!["a cat".to_string()]);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let provider = FakeProvider::failing(LlmError::AuthError("bad key".into()));
        assert!(matches!(
            generate(&provider, "a cat").await,
            Err(LlmError::AuthError(_))
        ));
    }
}
