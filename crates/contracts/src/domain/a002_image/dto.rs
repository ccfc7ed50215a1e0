use serde::{Deserialize, Serialize};

/// Тело `POST /api/image`
///
/// Отсутствующий `prompt` не считается ошибкой на нашей стороне:
/// пустая строка уходит провайдеру, и ошибку вернёт уже он.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Ответ `POST /api/image`: ровно один URL, никогда не массив
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}
