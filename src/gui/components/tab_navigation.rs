use crate::gui::components::{BundlePanel, ChatPanel, OptimizePanel};
use crate::gui::models::ActiveTab;
use dioxus::prelude::*;

/// タブナビゲーションコンポーネント
#[component]
pub fn TabNavigation(active_tab: ActiveTab, on_tab_change: EventHandler<ActiveTab>) -> Element {
    rsx! {
        nav {
            class: "tab-navigation",
            style: "
                display: flex;
                gap: 4px;
                padding: 8px 24px 0;
                border-bottom: 1px solid hsl(var(--border));
                flex-shrink: 0;
            ",

            for tab in ActiveTab::all() {
                TabButton {
                    key: "{tab:?}",
                    tab,
                    is_active: tab == active_tab,
                    on_click: move |_| on_tab_change.call(tab),
                }
            }
        }
    }
}

/// 個別のタブボタンコンポーネント
#[component]
fn TabButton(tab: ActiveTab, is_active: bool, on_click: EventHandler<MouseEvent>) -> Element {
    let button_style = if is_active {
        "
            display: flex;
            align-items: center;
            gap: 8px;
            padding: 10px 16px;
            border: none;
            border-bottom: 2px solid hsl(var(--accent));
            background: transparent;
            color: hsl(var(--foreground));
            font-weight: 600;
            font-size: 14px;
            cursor: pointer;
        "
    } else {
        "
            display: flex;
            align-items: center;
            gap: 8px;
            padding: 10px 16px;
            border: none;
            border-bottom: 2px solid transparent;
            background: transparent;
            color: hsl(var(--muted-foreground));
            font-weight: 500;
            font-size: 14px;
            cursor: pointer;
        "
    };

    rsx! {
        button {
            style: "{button_style}",
            onclick: on_click,

            span {
                style: "font-size: 16px;",
                "{tab.icon()}"
            }

            span {
                style: "white-space: nowrap;",
                "{tab}"
            }
        }
    }
}

/// タブコンテンツエリア
///
/// すべてのタブを常に描画し、表示/非表示で切り替える。
/// タブを移っても表示中のアニメーションや入力内容は失われない。
#[component]
pub fn TabContent(active_tab: ActiveTab) -> Element {
    let visibility = |tab: ActiveTab| {
        if tab == active_tab {
            "height: 100%;"
        } else {
            "display: none;"
        }
    };

    rsx! {
        div {
            class: "tab-content-container",
            style: "height: 100%;",

            div {
                class: "tab-content assistant",
                style: visibility(ActiveTab::Assistant),
                ChatPanel {}
            }

            div {
                class: "tab-content optimize",
                style: visibility(ActiveTab::Optimize),
                OptimizePanel {}
            }

            div {
                class: "tab-content bundles",
                style: visibility(ActiveTab::Bundles),
                BundlePanel {}
            }
        }
    }
}
