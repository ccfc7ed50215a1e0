pub mod dto;
pub mod history;
pub mod models;

pub use dto::*;
pub use history::{ChatLog, ChatTurn, TurnKind};
pub use models::{supports_attachments, wants_image, ModelOption, DEFAULT_MODEL, MODEL_OPTIONS};
