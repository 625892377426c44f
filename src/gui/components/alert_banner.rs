use crate::gui::{
    hooks::use_shop_genie,
    styles::theme::{get_alert_class, get_button_class},
};
use dioxus::prelude::*;

/// 画面上部の通知バナー
#[component]
pub fn AlertBanner() -> Element {
    let handle = use_shop_genie();
    let alert = handle.state.read().alert.clone();

    let Some(alert) = alert else {
        return rsx! {};
    };

    rsx! {
        div {
            class: get_alert_class(alert.level),
            role: "alert",

            div {
                strong { "{alert.title}" }
                if !alert.body.is_empty() {
                    div { "{alert.body}" }
                }
                // 手順は受け取った順に番号付きで表示
                if !alert.steps.is_empty() {
                    ol {
                        for (index, step) in alert.steps.iter().enumerate() {
                            li { key: "{index}", "{step}" }
                        }
                    }
                }
            }

            button {
                class: get_button_class("secondary", false),
                r#type: "button",
                onclick: move |_| handle.dismiss_alert(),
                "✕"
            }
        }
    }
}
