use crate::api::Suggestion;
use crate::gui::{
    components::StatefulButton,
    styles::theme::CssClasses,
};
use dioxus::prelude::*;

/// ローンチ素材のプレビュー
#[component]
pub fn SuggestionPreview(suggestion: Suggestion, applying: bool, on_apply: EventHandler<()>) -> Element {
    let tags = suggestion.tags.to_string();

    rsx! {
        div {
            class: CssClasses::PREVIEW_CARD,

            h3 { class: CssClasses::PANEL_TITLE, "Preview" }

            PreviewField { label: "Title",
                div { style: "font-size: 1.1rem; font-weight: 600;", "{suggestion.title}" }
            }

            // バックエンドが生成したHTMLをそのまま描画する
            PreviewField { label: "Description",
                div { dangerous_inner_html: "{suggestion.description_html}" }
            }

            if !suggestion.bullets.is_empty() {
                PreviewField { label: "Key Points",
                    ul {
                        style: "margin: 0; padding-left: 20px;",
                        for (index, bullet) in suggestion.bullets.iter().enumerate() {
                            li { key: "{index}", "{bullet}" }
                        }
                    }
                }
            }

            PreviewField { label: "Tags", div { "{tags}" } }

            div {
                style: "display: grid; grid-template-columns: 1fr 1fr; gap: 12px;",
                PreviewField { label: "SEO Title", div { "{suggestion.seo_title}" } }
                PreviewField { label: "SEO Description", div { "{suggestion.seo_description}" } }
            }

            div {
                class: CssClasses::HIGHLIGHT_DISCOUNT,
                div { class: CssClasses::PREVIEW_LABEL, "Discount Code" }
                strong { "{suggestion.discount_code} ({suggestion.discount_percent}% off)" }
            }

            div {
                class: CssClasses::HIGHLIGHT_BANNER,
                div { class: CssClasses::PREVIEW_LABEL, "Banner Copy" }
                div { "{suggestion.banner_copy}" }
            }

            StatefulButton {
                label: "Apply to Store",
                busy_label: "Applying...",
                busy: applying,
                variant: "success",
                onclick: move |_| on_apply.call(()),
            }
        }
    }
}

#[component]
pub(crate) fn PreviewField(label: String, children: Element) -> Element {
    rsx! {
        div {
            class: CssClasses::PREVIEW_FIELD,
            span { class: CssClasses::PREVIEW_LABEL, "{label}" }
            {children}
        }
    }
}
