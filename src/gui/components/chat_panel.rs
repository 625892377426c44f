use crate::api::{Product, ProductId};
use crate::gui::{
    components::{BundlePreviewCard, DottedGlowBackground, ProductGrid},
    hooks::{use_shop_genie, use_typewriter},
    models::{Activity, ChatMessage, ChatPayload, ConversationStep},
    styles::theme::{get_button_class, get_message_class, CssClasses},
    utils::UiUpdateTimer,
};
use dioxus::prelude::*;

/// ウェルカム画面から送れる定型プロンプト
const STARTER_PROMPTS: [&str; 2] = [
    "I want to create a bundle",
    "Help me optimize a product launch",
];

/// アシスタントタブのチャット画面
///
/// 最新のアシスタント発言だけをタイプライター表示し、
/// 最新の商品選択メッセージだけがクリックを受け付ける。
#[component]
pub fn ChatPanel() -> Element {
    let _timer = UiUpdateTimer::new("chat_panel");
    let handle = use_shop_genie();
    let state = handle.state.read();
    let messages = state.chat.clone();
    let step = state.step.clone();
    let thinking = state.is_busy(Activity::Thinking);
    let creating = state.is_busy(Activity::CreatingBundle);
    let has_bundle_draft = state.bundle.bundle.is_some();
    let animated_id = state.last_assistant_message().map(|message| message.id.clone());
    drop(state);

    let latest_selection_id = messages
        .iter()
        .rev()
        .find(|message| matches!(message.payload, ChatPayload::ProductSelection { .. }))
        .map(|message| message.id.clone());
    let latest_preview_id = messages
        .iter()
        .rev()
        .find(|message| matches!(message.payload, ChatPayload::BundlePreview(_)))
        .map(|message| message.id.clone());
    let chosen_a = match &step {
        ConversationStep::AwaitingBundleProductB { product_a } => Some(*product_a),
        _ => None,
    };

    let mut prompt = use_signal(String::new);
    let submit_handle = handle.clone();
    let on_submit = move |event: FormEvent| {
        event.prevent_default();
        let text = prompt.read().trim().to_string();
        if text.is_empty() {
            return;
        }
        submit_handle.send_prompt(text);
        prompt.set(String::new());
    };

    let last_index = messages.len().saturating_sub(1);

    rsx! {
        div {
            class: CssClasses::CHAT_PANEL,

            if messages.is_empty() {
                div {
                    class: CssClasses::WELCOME,
                    DottedGlowBackground {}
                    h2 { "How can I help with your store today?" }
                    p { class: CssClasses::NAVBAR_HINT, "Ask for a bundle or a launch-ready product listing." }
                    div {
                        class: CssClasses::BTN_GROUP,
                        for starter in STARTER_PROMPTS {
                            StarterButton { key: "{starter}", text: starter.to_string() }
                        }
                    }
                }
            } else {
                div {
                    class: CssClasses::MESSAGE_LIST,
                    for (index, message) in messages.into_iter().enumerate() {
                        ChatBubble {
                            key: "{message.id}",
                            animate: animated_id.as_deref() == Some(message.id.as_str()),
                            selectable: step.accepts_product_click()
                                && latest_selection_id.as_deref() == Some(message.id.as_str()),
                            creatable: has_bundle_draft
                                && latest_preview_id.as_deref() == Some(message.id.as_str()),
                            scroll_into_view: index == last_index,
                            chosen_a,
                            creating,
                            message,
                        }
                    }
                    if thinking {
                        div {
                            class: get_message_class(crate::gui::models::ChatRole::Assistant),
                            div {
                                class: format!("{} {}", CssClasses::MESSAGE_BUBBLE, CssClasses::TYPING_INDICATOR),
                                span {}
                                span {}
                                span {}
                            }
                        }
                    }
                }
            }

            form {
                class: CssClasses::PROMPT_FORM,
                onsubmit: on_submit,
                input {
                    class: CssClasses::FORM_INPUT,
                    r#type: "text",
                    placeholder: "Ask ShopGenie to build a bundle or optimize a product...",
                    value: "{prompt}",
                    disabled: thinking,
                    oninput: move |event| prompt.set(event.value()),
                }
                button {
                    class: get_button_class("primary", thinking),
                    r#type: "submit",
                    disabled: thinking,
                    "Send"
                }
            }
        }
    }
}

#[component]
fn StarterButton(text: String) -> Element {
    let handle = use_shop_genie();
    let prompt = text.clone();
    rsx! {
        button {
            class: get_button_class("secondary", false),
            onclick: move |_| handle.send_prompt(prompt.clone()),
            "{text}"
        }
    }
}

/// 1件分のメッセージ表示
#[component]
fn ChatBubble(
    message: ChatMessage,
    animate: bool,
    selectable: bool,
    creatable: bool,
    scroll_into_view: bool,
    chosen_a: Option<ProductId>,
    creating: bool,
) -> Element {
    let handle = use_shop_genie();
    let click_handle = handle.clone();
    let create_handle = handle.clone();

    let badges = match (&message.payload, chosen_a) {
        (ChatPayload::ProductSelection { products }, Some(id))
            if products.iter().any(|product| product.id == id) =>
        {
            vec![(id, "A".to_string())]
        }
        _ => Vec::new(),
    };

    rsx! {
        div {
            class: get_message_class(message.role),
            onmounted: move |event| async move {
                if scroll_into_view {
                    let _ = event.scroll_to(ScrollBehavior::Smooth).await;
                }
            },

            div {
                class: CssClasses::MESSAGE_BUBBLE,
                if animate {
                    TypewriterText { message_id: message.id.clone(), text: message.content.clone() }
                } else {
                    "{message.content}"
                }
            }

            match message.payload.clone() {
                ChatPayload::Text => rsx! {},
                ChatPayload::ProductSelection { products } => rsx! {
                    ProductGrid {
                        products,
                        clickable: selectable,
                        badges,
                        on_click: move |product: Product| click_handle.click_product(product),
                    }
                },
                ChatPayload::BundlePreview(preview) => rsx! {
                    BundlePreviewCard {
                        preview: *preview,
                        creating,
                        disabled: !creatable,
                        on_create: move |_| create_handle.create_bundle(),
                    }
                },
            }

            span { class: CssClasses::MESSAGE_TIMESTAMP, "{message.timestamp}" }
        }
    }
}

#[component]
fn TypewriterText(message_id: String, text: String) -> Element {
    let visible = use_typewriter(message_id, text);
    rsx! { "{visible}" }
}
