//! Каталог моделей, которые предлагает UI.
//!
//! Backend этот список не проверяет: идентификатор модели уходит провайдеру
//! как есть, и только провайдер решает, существует ли такая модель.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Модель, для которой доступны вложения и генерация изображений
const MULTIMODAL_MODEL: &str = "gpt-4o";

const IMAGE_TRIGGER: &str = "generate an image";

pub const MODEL_OPTIONS: &[ModelOption] = &[
    ModelOption {
        id: "gpt-3.5-turbo",
        label: "GPT-3.5",
    },
    ModelOption {
        id: "gpt-4",
        label: "GPT-4",
    },
    ModelOption {
        id: MULTIMODAL_MODEL,
        label: "GPT-4o",
    },
];

/// Нужно ли отправить ввод в `/api/image` вместо `/api/chat`
pub fn wants_image(model: &str, input: &str) -> bool {
    model == MULTIMODAL_MODEL && input.to_lowercase().contains(IMAGE_TRIGGER)
}

/// Показывать ли выбор файла для модели
pub fn supports_attachments(model: &str) -> bool {
    model == MULTIMODAL_MODEL
}
