use serde::{Deserialize, Serialize};

/// Имя текстового поля с промптом в multipart-форме `/api/chat`
pub const FIELD_PROMPT: &str = "prompt";
/// Имя текстового поля с идентификатором модели
pub const FIELD_MODEL: &str = "model";
/// Поле для нескольких файлов
pub const FIELD_FILES: &str = "files";
/// Поле для одного файла (так отправляет однофайловый клиент)
pub const FIELD_FILE: &str = "file";

/// Ответ `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}
