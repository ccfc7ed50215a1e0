//! Chat page - View Component

use super::view_model::ChatPageVm;
use crate::shared::icons::icon;
use crate::shared::markdown::{highlight_code_blocks, render_markdown};
use contracts::domain::a001_chat::{supports_attachments, ChatTurn, TurnKind, MODEL_OPTIONS};
use leptos::prelude::*;
use thaw::*;

/// Файлы, выбранные в поле ввода; поле сразу очищается
fn take_selected_files(input: &web_sys::HtmlInputElement) -> Vec<web_sys::File> {
    let files = input
        .files()
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default();
    input.set_value("");
    files
}

#[component]
#[allow(non_snake_case)]
fn TurnBubble(turn: ChatTurn) -> impl IntoView {
    let (align, background) = match turn.kind {
        TurnKind::User => (
            "justify-content: flex-end;",
            "background: var(--colorBrandBackground); color: var(--colorNeutralForegroundOnBrand);",
        ),
        TurnKind::Assistant => (
            "justify-content: flex-start;",
            "background: var(--colorNeutralBackground3);",
        ),
        TurnKind::Error => (
            "justify-content: flex-start;",
            "background: var(--color-error-50); color: var(--color-error); border: 1px solid var(--color-error-100);",
        ),
    };

    let body = match turn.kind {
        // ответы модели приходят в markdown
        TurnKind::Assistant => view! {
            <div class="markdown-body" inner_html=render_markdown(&turn.content)></div>
        }
        .into_any(),
        _ => view! { <div style="white-space: pre-wrap;">{turn.content.clone()}</div> }.into_any(),
    };

    view! {
        <div style={format!("display: flex; {}", align)}>
            <div style={format!(
                "max-width: 70%; padding: 10px 14px; border-radius: 12px; {}",
                background,
            )}>
                {body}
                {turn
                    .image_url
                    .map(|url| {
                        view! {
                            <img
                                src=url
                                alt="Generated Image"
                                style="margin-top: 8px; max-width: 100%; border-radius: 8px;"
                            />
                        }
                    })}
            </div>
        </div>
    }
}

#[component]
#[allow(non_snake_case)]
pub fn ChatPage() -> impl IntoView {
    let vm = ChatPageVm::new();
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();
    let file_input_ref = NodeRef::<leptos::html::Input>::new();
    let busy = Signal::derive(move || vm.is_busy());

    // Прокрутка вниз и подсветка кода после каждой новой реплики
    Effect::new(move |_| {
        vm.log.with(|log| log.turns().len());
        if let Some(container) = messages_container_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
                highlight_code_blocks();
            });
        }
    });

    let handle_send = Callback::new(move |_| {
        let attachments_allowed = vm.model.with_untracked(|model| supports_attachments(model));
        // файлы забираем только после того, как запрос принят
        vm.send(|| {
            file_input_ref
                .get_untracked()
                .filter(|_| attachments_allowed)
                .map(|input| take_selected_files(&input))
                .unwrap_or_default()
        });
    });

    view! {
        <div style="display: flex; height: 100vh; background: var(--colorNeutralBackground2);">
            // Sidebar
            <div style="width: 256px; padding: 16px; background: var(--colorNeutralBackgroundInverted); color: var(--colorNeutralForegroundInverted);">
                <h2 style="font-size: 20px; font-weight: bold; margin-bottom: 16px;">"Chat Relay"</h2>
            </div>

            <div style="flex: 1; display: flex; flex-direction: column; min-width: 0;">
                // Messages area
                <div
                    node_ref=messages_container_ref
                    style="flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 16px; padding: 16px;"
                >
                    <Show
                        when=move || vm.log.with(|log| !log.turns().is_empty())
                        fallback=|| {
                            view! {
                                <div style="text-align: center; color: var(--colorNeutralForeground3);">
                                    "Start a conversation by typing a message below."
                                </div>
                            }
                        }
                    >
                        <For
                            each=move || vm.log.with(|log| log.turns().to_vec())
                            key=|turn| turn.id
                            let:turn
                        >
                            <TurnBubble turn=turn />
                        </For>
                    </Show>
                </div>

                // Input area
                <form
                    style="padding: 16px; background: var(--colorNeutralBackground1); border-top: 1px solid var(--colorNeutralStroke2); display: flex; flex-direction: column; gap: 8px;"
                    on:submit=move |ev: leptos::ev::SubmitEvent| {
                        ev.prevent_default();
                        handle_send.run(());
                    }
                >
                    <label style="font-weight: bold;">"Select Model"</label>
                    <Select value=vm.model disabled=busy>
                        {MODEL_OPTIONS
                            .iter()
                            .map(|option| view! { <option value=option.id>{option.label}</option> })
                            .collect_view()}
                    </Select>

                    <Show when=move || vm.model.with(|model| supports_attachments(model))>
                        <label style="font-weight: bold;">
                            {icon("attach")}
                            " Attach Files"
                        </label>
                        <input
                            type="file"
                            multiple=true
                            node_ref=file_input_ref
                            disabled=move || busy.get()
                        />
                    </Show>

                    <Flex style="gap: 8px; align-items: center;">
                        <div style="flex: 1;">
                            <Input
                                value=vm.input
                                placeholder="Type a message..."
                                disabled=busy
                                attr:style="width: 100%;"
                            />
                        </div>
                        <button
                            type="submit"
                            disabled=move || busy.get()
                            style=move || {
                                format!(
                                    "border: none; border-radius: 50%; padding: 6px; color: white; cursor: pointer; background: {};",
                                    if busy.get() { "var(--colorNeutralBackgroundDisabled)" } else { "var(--colorPaletteRedBackground3)" },
                                )
                            }
                        >
                            {icon("send")}
                        </button>
                    </Flex>
                </form>
            </div>
        </div>
    }
}
