//! Chat page - View Model

use super::model;
use contracts::domain::a001_chat::{wants_image, ChatLog, DEFAULT_MODEL};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ChatPageVm {
    pub log: RwSignal<ChatLog>,
    pub input: RwSignal<String>,
    pub model: RwSignal<String>,
}

impl ChatPageVm {
    pub fn new() -> Self {
        Self {
            log: RwSignal::new(ChatLog::new()),
            input: RwSignal::new(String::new()),
            model: RwSignal::new(DEFAULT_MODEL.to_string()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.log.with(|log| log.is_busy())
    }

    /// Отправить текущий ввод.
    ///
    /// Ничего не делает, если ввод пустой или предыдущий запрос ещё не
    /// завершён; `take_files` тогда не вызывается и выбранные файлы остаются
    /// в поле. Ответ, картинка или ошибка всегда добавляются одной репликой
    /// и снимают флаг занятости.
    pub fn send<F>(&self, take_files: F)
    where
        F: FnOnce() -> Vec<web_sys::File>,
    {
        let prompt = self.input.get_untracked();
        let model_id = self.model.get_untracked();

        let mut accepted = false;
        self.log.update(|log| accepted = log.begin(&prompt));
        if !accepted {
            return;
        }
        self.input.set(String::new());
        let files = take_files();

        let chat_log = self.log;
        wasm_bindgen_futures::spawn_local(async move {
            if wants_image(&model_id, &prompt) {
                match model::generate_image(&prompt).await {
                    Ok(data) => chat_log.update(|l| l.finish_with_image(data.image_url)),
                    Err(e) => {
                        log::error!("Error calling image API: {}", e);
                        chat_log.update(|l| l.finish_with_error(e));
                    }
                }
            } else {
                match model::send_chat(&prompt, &model_id, files).await {
                    Ok(data) => chat_log.update(|l| l.finish_with_reply(data.response)),
                    Err(e) => {
                        log::error!("Error calling chat API: {}", e);
                        chat_log.update(|l| l.finish_with_error(e));
                    }
                }
            }
        });
    }
}

impl Default for ChatPageVm {
    fn default() -> Self {
        Self::new()
    }
}
