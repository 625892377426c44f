use dioxus::prelude::*;

use crate::gui::{
    components::{AlertBanner, Navbar, TabContent, TabNavigation},
    config_manager::ThemeConfig,
    hooks::use_shop_genie_provider,
    styles::theme::{get_embedded_css, CssClasses},
};

/// メインウィンドウコンポーネント
///
/// コントローラーのハンドルをここで提供し、配下のコンポーネントはそれを参照する。
#[component]
pub fn MainWindow() -> Element {
    let handle = use_shop_genie_provider();
    let dark_mode = try_use_context::<ThemeConfig>()
        .map(|theme| theme.dark_mode)
        .unwrap_or_default();
    let active_tab = handle.state.read().active_tab;

    tracing::debug!("🖥️ MainWindow: Rendering with active_tab={:?}", active_tab);

    let root_class = if dark_mode {
        format!("{} {}", CssClasses::APP, CssClasses::DARK)
    } else {
        CssClasses::APP.to_string()
    };
    let tab_handle = handle.clone();

    rsx! {
        // CSSスタイルをdocument headに注入
        document::Style {
            {get_embedded_css()}
        }

        div {
            class: root_class,

            div {
                class: CssClasses::MAIN_WINDOW,

                Navbar {}
                AlertBanner {}
                TabNavigation {
                    active_tab,
                    on_tab_change: move |tab| tab_handle.set_active_tab(tab),
                }

                main {
                    class: CssClasses::MAIN_CONTENT,
                    TabContent { active_tab }
                }
            }
        }
    }
}
