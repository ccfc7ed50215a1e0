//! Markdown ответов ассистента в HTML.

use pulldown_cmark::{html, Event, Options, Parser};

/// Отрисовать markdown в безопасный HTML.
///
/// Сырой HTML из ответа модели показывается как текст. Блоки кода получают
/// класс `language-*`, по которому их раскрашивает highlight.js.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, events);

    ammonia::Builder::default()
        .add_tag_attributes("code", &["class"])
        .clean(&rendered)
        .to_string()
}

/// Подсветить блоки кода, если на странице подключён highlight.js
pub fn highlight_code_blocks() {
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(hljs) = js_sys::Reflect::get(&window, &"hljs".into()) else {
        return;
    };
    if hljs.is_undefined() {
        return;
    }
    if let Ok(highlight_all) = js_sys::Reflect::get(&hljs, &"highlightAll".into()) {
        if let Ok(func) = highlight_all.dyn_into::<js_sys::Function>() {
            let _ = func.call0(&hljs);
        }
    }
}
