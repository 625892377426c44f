use crate::gui::styles::theme::{get_button_class, CssClasses};
use dioxus::prelude::*;

/// 実行中はスピナーを表示して無効化されるボタン
#[component]
pub fn StatefulButton(
    label: String,
    busy: bool,
    onclick: EventHandler<()>,
    #[props(default = "Connecting...".to_string())] busy_label: String,
    #[props(default)] disabled: bool,
    #[props(default = "primary".to_string())] variant: String,
) -> Element {
    let is_disabled = busy || disabled;

    rsx! {
        button {
            class: get_button_class(&variant, is_disabled),
            r#type: "button",
            disabled: is_disabled,
            onclick: move |_| {
                if !is_disabled {
                    onclick.call(());
                }
            },

            if busy {
                span { class: CssClasses::SPINNER }
                span { "{busy_label}" }
            } else {
                "{label}"
            }
        }
    }
}
