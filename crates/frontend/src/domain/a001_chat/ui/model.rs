//! Chat page - Model (API functions)

use crate::shared::api_utils::{api_url, fetch_json};
use contracts::domain::a001_chat::{ChatResponse, FIELD_FILES, FIELD_MODEL, FIELD_PROMPT};
use contracts::domain::a002_image::{ImageRequest, ImageResponse};

/// Отправить промпт и вложения в /api/chat
pub async fn send_chat(
    prompt: &str,
    model: &str,
    files: Vec<web_sys::File>,
) -> Result<ChatResponse, String> {
    use web_sys::{FormData, Request, RequestInit, RequestMode};

    let form_data = FormData::new().map_err(|e| format!("{e:?}"))?;
    form_data
        .append_with_str(FIELD_PROMPT, prompt)
        .map_err(|e| format!("{e:?}"))?;
    form_data
        .append_with_str(FIELD_MODEL, model)
        .map_err(|e| format!("{e:?}"))?;
    for file in &files {
        form_data
            .append_with_blob_and_filename(FIELD_FILES, file, &file.name())
            .map_err(|e| format!("{e:?}"))?;
    }

    // Content-Type с boundary браузер выставит сам
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form_data);

    let request =
        Request::new_with_str_and_init(&api_url("/api/chat"), &opts).map_err(|e| format!("{e:?}"))?;

    fetch_json(&request).await
}

/// Сгенерировать изображение через /api/image
pub async fn generate_image(prompt: &str) -> Result<ImageResponse, String> {
    use web_sys::{Request, RequestInit, RequestMode};

    let dto = ImageRequest {
        prompt: prompt.to_string(),
    };
    let body = serde_json::to_string(&dto).map_err(|e| format!("{e}"))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&wasm_bindgen::JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&api_url("/api/image"), &opts)
        .map_err(|e| format!("{e:?}"))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{e:?}"))?;

    fetch_json(&request).await
}
