use crate::api::error::ApiError;
use crate::domain::a001_chat::service;
use crate::shared::uploads;
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use contracts::domain::a001_chat::ChatResponse;

/// POST /api/chat
///
/// Форма живёт до конца обработчика, поэтому загруженные файлы удаляются
/// при любом исходе запроса.
pub async fn send_message(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ChatResponse>, ApiError> {
    let uploads_cfg = &state.config.uploads;
    let form =
        uploads::read_chat_form(&mut multipart, &uploads_cfg.dir, uploads_cfg.max_files).await?;

    let response = service::send(state.provider.as_ref(), uploads_cfg.unsupported, &form).await?;
    Ok(Json(response))
}
