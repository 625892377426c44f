use crate::gui::{
    components::{suggestion_preview::PreviewField, StatefulButton},
    models::BundlePreview,
    styles::theme::CssClasses,
};
use dioxus::prelude::*;

/// バンドルのプレビュー（チャットとバンドルタブで共用）
#[component]
pub fn BundlePreviewCard(
    preview: BundlePreview,
    creating: bool,
    on_create: EventHandler<()>,
    #[props(default)] disabled: bool,
) -> Element {
    let BundlePreview {
        product_a,
        product_b,
        bundle,
    } = preview;
    let estimated = bundle
        .estimated_price(&product_a, &product_b)
        .map(|price| format!("${price:.2}"));
    let tags = bundle.tags.to_string();

    rsx! {
        div {
            class: CssClasses::PREVIEW_CARD,

            h3 { class: CssClasses::PANEL_TITLE, "🎁 {bundle.title}" }

            div {
                style: "display: flex; gap: 12px;",
                for product in [&product_a, &product_b] {
                    div {
                        key: "{product.id}",
                        style: "flex: 1; display: flex; gap: 8px; align-items: center;",
                        if let Some(src) = product.primary_image() {
                            img {
                                class: CssClasses::PRODUCT_IMAGE,
                                style: "width: 48px;",
                                src: "{src}",
                            }
                        }
                        div {
                            div { class: CssClasses::PRODUCT_TITLE, "{product.title}" }
                            if let Some(price) = product.price_label() {
                                div { class: CssClasses::PRODUCT_PRICE, "{price}" }
                            }
                        }
                    }
                }
            }

            PreviewField { label: "Description",
                div { dangerous_inner_html: "{bundle.description_html}" }
            }

            PreviewField { label: "Tags", div { "{tags}" } }

            div {
                class: CssClasses::HIGHLIGHT_DISCOUNT,
                div { class: CssClasses::PREVIEW_LABEL, "Bundle Discount" }
                strong { "{bundle.bundle_price_percent_off}% off" }
                if let Some(price) = estimated {
                    span { " · estimated {price}" }
                }
            }

            if !bundle.bundle_notes.is_empty() {
                PreviewField { label: "Notes", div { "{bundle.bundle_notes}" } }
            }

            StatefulButton {
                label: "Create Bundle in Store",
                busy_label: "Creating...",
                busy: creating,
                disabled,
                variant: "success",
                onclick: move |_| on_create.call(()),
            }
        }
    }
}
