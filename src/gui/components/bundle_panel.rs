use crate::gui::{
    components::{BundlePreviewCard, ProductGrid, StatefulButton},
    hooks::use_shop_genie,
    models::{Activity, BundlePreview},
    styles::theme::CssClasses,
};
use dioxus::prelude::*;

/// バンドルタブ
///
/// グリッドで2商品を選び、バンドルを生成してストアに作成する。
#[component]
pub fn BundlePanel() -> Element {
    let handle = use_shop_genie();
    let state = handle.state.read();
    let connected = state.session.connected;
    let products = state.products.clone();
    let draft = state.bundle.clone();
    let generating = state.is_busy(Activity::GeneratingBundle);
    let creating = state.is_busy(Activity::CreatingBundle);
    drop(state);

    if !connected {
        return rsx! {
            div { class: CssClasses::EMPTY_STATE, "Connect your Shopify store to build bundles." }
        };
    }

    let mut badges = Vec::new();
    if let Some(id) = draft.product_a_id {
        badges.push((id, "A".to_string()));
    }
    if let Some(id) = draft.product_b_id {
        badges.push((id, "B".to_string()));
    }

    let preview = match (draft.product_a, draft.product_b, draft.bundle) {
        (Some(product_a), Some(product_b), Some(bundle)) => Some(BundlePreview {
            product_a,
            product_b,
            bundle,
        }),
        _ => None,
    };
    let has_pair = draft.product_a_id.is_some() && draft.product_b_id.is_some();

    let toggle_handle = handle.clone();
    let generate_handle = handle.clone();
    let create_handle = handle.clone();

    rsx! {
        div {
            class: CssClasses::PANEL,

            h2 { class: CssClasses::PANEL_TITLE, "🎁 Bundles" }
            p { class: CssClasses::NAVBAR_HINT, "Pick two products to combine into a bundle." }

            if products.is_empty() {
                div { class: CssClasses::EMPTY_STATE, "Load your products from the navigation bar to get started." }
            } else {
                ProductGrid {
                    products,
                    clickable: true,
                    badges,
                    on_click: move |product: crate::api::Product| toggle_handle.toggle_bundle_product(product.id),
                }

                StatefulButton {
                    label: "Generate Bundle",
                    busy_label: "Generating...",
                    busy: generating,
                    disabled: !has_pair,
                    onclick: move |_| generate_handle.generate_bundle(),
                }
            }

            if let Some(preview) = preview {
                BundlePreviewCard {
                    preview,
                    creating,
                    on_create: move |_| create_handle.create_bundle(),
                }
            }
        }
    }
}
