use crate::api::ProductId;
use crate::gui::{
    components::{StatefulButton, SuggestionPreview},
    hooks::use_shop_genie,
    models::Activity,
    styles::theme::CssClasses,
};
use dioxus::prelude::*;

/// ローンチ素材タブ
///
/// 商品を1つ選んで素材を生成し、プレビューを確認してストアへ反映する。
#[component]
pub fn OptimizePanel() -> Element {
    let handle = use_shop_genie();
    let state = handle.state.read();
    let connected = state.session.connected;
    let products = state.products.clone();
    let selected = state.optimize.selected;
    let suggestion = state.optimize.suggestion.clone();
    let generating = state.is_busy(Activity::Generating);
    let applying = state.is_busy(Activity::Applying);
    drop(state);

    if !connected {
        return rsx! {
            div { class: CssClasses::EMPTY_STATE, "Connect your Shopify store to generate launch assets." }
        };
    }

    let select_handle = handle.clone();
    let generate_handle = handle.clone();
    let apply_handle = handle.clone();

    rsx! {
        div {
            class: CssClasses::PANEL,

            h2 { class: CssClasses::PANEL_TITLE, "🚀 Launch Assets" }

            if products.is_empty() {
                div { class: CssClasses::EMPTY_STATE, "Load your products from the navigation bar to get started." }
            } else {
                select {
                    class: CssClasses::FORM_INPUT,
                    value: selected.map(|id| id.to_string()).unwrap_or_default(),
                    onchange: move |event| {
                        let product_id = event.value().parse::<i64>().ok().map(ProductId);
                        select_handle.select_optimize_product(product_id);
                    },
                    option { value: "", "Select a product" }
                    for product in products.iter() {
                        option {
                            key: "{product.id}",
                            value: "{product.id}",
                            selected: selected == Some(product.id),
                            "{product.title}"
                        }
                    }
                }

                StatefulButton {
                    label: "Generate Launch Assets",
                    busy_label: "Generating...",
                    busy: generating,
                    disabled: selected.is_none(),
                    onclick: move |_| generate_handle.generate(),
                }
            }

            if let Some(suggestion) = suggestion {
                SuggestionPreview {
                    suggestion,
                    applying,
                    on_apply: move |_| apply_handle.apply(),
                }
            }
        }
    }
}
