use crate::api::error::ApiError;
use crate::domain::a002_image::service;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use contracts::domain::a002_image::{ImageRequest, ImageResponse};

/// Тело запроса без проверки Content-Type: пустое или не-JSON тело даёт
/// пустой промпт, и ошибку вернёт провайдер в обычном формате `{error, details}`
fn parse_request(body: &[u8]) -> ImageRequest {
    if body.is_empty() {
        return ImageRequest::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::warn!("Image request body is not valid JSON: {}", e);
        ImageRequest::default()
    })
}

/// POST /api/image
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImageResponse>, ApiError> {
    let request = parse_request(&body);
    let response = service::generate(state.provider.as_ref(), &request.prompt).await?;
    Ok(Json(response))
}
