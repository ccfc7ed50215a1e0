//! Журнал реплик чата в памяти браузера.
//!
//! Журнал живёт только на странице: ничего не сохраняется и не отправляется
//! обратно на сервер. Флаг `busy` гарантирует, что в полёте не больше одного
//! запроса.

use serde::{Deserialize, Serialize};

/// Тип реплики
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    User,
    Assistant,
    Error,
}

/// Одна реплика в ленте чата
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: u64,
    pub kind: TurnKind,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
    next_id: u64,
    busy: bool,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Начать обмен: добавить реплику пользователя и поднять флаг занятости.
    ///
    /// Возвращает `false` и ничего не меняет, если запрос уже в полёте
    /// или ввод пустой.
    pub fn begin(&mut self, prompt: &str) -> bool {
        if self.busy || prompt.trim().is_empty() {
            return false;
        }
        self.push(TurnKind::User, prompt.to_string(), None);
        self.busy = true;
        true
    }

    pub fn finish_with_reply(&mut self, text: impl Into<String>) {
        self.push(TurnKind::Assistant, text.into(), None);
        self.busy = false;
    }

    pub fn finish_with_image(&mut self, url: impl Into<String>) {
        let url = url.into();
        self.push(
            TurnKind::Assistant,
            format!("Here is the image: {}", url),
            Some(url),
        );
        self.busy = false;
    }

    pub fn finish_with_error(&mut self, message: impl AsRef<str>) {
        self.push(
            TurnKind::Error,
            format!(
                "Sorry, there was an error processing your request: {}",
                message.as_ref()
            ),
            None,
        );
        self.busy = false;
    }

    fn push(&mut self, kind: TurnKind, content: String, image_url: Option<String>) {
        self.turns.push(ChatTurn {
            id: self.next_id,
            kind,
            content,
            image_url,
        });
        self.next_id += 1;
    }
}
