use std::time::Duration;

use crate::gui::{
    components::StatefulButton,
    hooks::use_shop_genie,
    models::Activity,
    styles::theme::{get_button_class, CssClasses},
};
use crate::shop::normalize_shop_domain;
use dioxus::prelude::*;

/// ログイン案内を表示してから入力欄を出すまでの待ち時間
const LOGIN_HINT_DELAY_MS: u64 = 1500;

/// ナビゲーションバー
///
/// 未接続時はストアURLの入力フォーム、接続時はショップ名と操作ボタンを表示する。
#[component]
pub fn Navbar() -> Element {
    let handle = use_shop_genie();
    let state = handle.state.read();
    let connected = state.session.connected;
    let shop = state.session.shop.clone();
    let connecting = state.is_busy(Activity::Connecting);
    let disconnecting = state.is_busy(Activity::Disconnecting);
    let loading_products = state.is_busy(Activity::LoadingProducts);
    let diagnosing = state.is_busy(Activity::Diagnosing);
    drop(state);

    let mut show_login_message = use_signal(|| false);
    let mut show_form = use_signal(|| false);
    let mut shop_url = use_signal(String::new);
    let mut waiting_for_form = use_signal(|| false);

    let open_form = move |_: ()| {
        show_login_message.set(true);
        waiting_for_form.set(true);
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(LOGIN_HINT_DELAY_MS)).await;
            waiting_for_form.set(false);
            if show_login_message() {
                show_form.set(true);
            }
        });
    };

    let mut close_form = move || {
        show_form.set(false);
        show_login_message.set(false);
        shop_url.set(String::new());
    };

    // 入力中のドメインを正規化して、接続先または入力エラーを案内する
    let normalized = normalize_shop_domain(&shop_url.read());
    let can_submit = normalized.is_ok();
    let domain_hint = match &normalized {
        Ok(domain) => Some((format!("→ {domain}"), false)),
        Err(_) if shop_url.read().trim().is_empty() => None,
        Err(error) => Some((error.to_string(), true)),
    };

    let submit_handle = handle.clone();
    let on_submit = move |event: FormEvent| {
        event.prevent_default();
        let input = shop_url.read().trim().to_string();
        if input.is_empty() {
            return;
        }
        submit_handle.connect(input);
        close_form();
    };

    let load_handle = handle.clone();
    let disconnect_handle = handle.clone();
    let diagnose_handle = handle.clone();

    rsx! {
        nav {
            class: CssClasses::NAVBAR,

            div {
                style: "display: flex; align-items: baseline; gap: 8px;",
                span { class: CssClasses::NAVBAR_BRAND, "ShopGenie" }
                span { class: CssClasses::NAVBAR_HINT, "AI-powered Shopify assistant" }
            }

            div {
                class: CssClasses::NAVBAR_ACTIONS,

                StatefulButton {
                    label: "Test AI Backend",
                    busy_label: "Testing...",
                    busy: diagnosing,
                    variant: "secondary",
                    onclick: move |_| diagnose_handle.diagnose(),
                }

                if connected {
                    span {
                        class: CssClasses::CONNECTED_LABEL,
                        "● Connected to {shop}"
                    }
                    StatefulButton {
                        label: "Load Products",
                        busy_label: "Loading...",
                        busy: loading_products,
                        onclick: move |_| load_handle.load_products(),
                    }
                    StatefulButton {
                        label: "Disconnect",
                        busy_label: "Disconnecting...",
                        busy: disconnecting,
                        variant: "danger",
                        onclick: move |_| disconnect_handle.disconnect(),
                    }
                } else if show_form() {
                    form {
                        class: CssClasses::SHOP_FORM,
                        onsubmit: on_submit,

                        div {
                            style: "display: flex; flex-direction: column; gap: 2px;",
                            input {
                                class: CssClasses::FORM_INPUT,
                                r#type: "text",
                                placeholder: "your-store.myshopify.com",
                                autofocus: true,
                                value: "{shop_url}",
                                oninput: move |event| shop_url.set(event.value()),
                            }
                            if let Some((hint, is_error)) = domain_hint {
                                span {
                                    class: CssClasses::NAVBAR_HINT,
                                    style: if is_error { "color: hsl(var(--danger));" } else { "" },
                                    "{hint}"
                                }
                            }
                        }
                        button {
                            class: get_button_class("secondary", false),
                            r#type: "button",
                            onclick: move |_| close_form(),
                            "Cancel"
                        }
                        button {
                            class: get_button_class("primary", !can_submit),
                            r#type: "submit",
                            disabled: !can_submit,
                            "Connect"
                        }
                    }
                } else {
                    if show_login_message() {
                        span { class: CssClasses::NAVBAR_HINT, "Please login to your account" }
                    }
                    StatefulButton {
                        label: "Connect to Shopify",
                        busy: connecting || waiting_for_form(),
                        onclick: open_form,
                    }
                }
            }
        }
    }
}
