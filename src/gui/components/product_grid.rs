use crate::api::{Product, ProductId};
use crate::gui::styles::theme::{get_product_card_class, CssClasses};
use dioxus::prelude::*;

/// 商品グリッド
///
/// `badges` に含まれる商品は選択中として表示する（A/Bなどのラベル付き）。
#[component]
pub fn ProductGrid(
    products: Vec<Product>,
    clickable: bool,
    on_click: EventHandler<Product>,
    #[props(default)] badges: Vec<(ProductId, String)>,
) -> Element {
    if products.is_empty() {
        return rsx! {
            div { class: CssClasses::EMPTY_STATE, "No products to show." }
        };
    }

    rsx! {
        div {
            class: CssClasses::PRODUCT_GRID,

            for product in products {
                ProductCard {
                    key: "{product.id}",
                    badge: badges
                        .iter()
                        .find(|(id, _)| *id == product.id)
                        .map(|(_, label)| label.clone()),
                    clickable,
                    on_click,
                    product,
                }
            }
        }
    }
}

#[component]
fn ProductCard(
    product: Product,
    badge: Option<String>,
    clickable: bool,
    on_click: EventHandler<Product>,
) -> Element {
    let image = product.primary_image().map(str::to_string);
    let alt = product
        .images
        .first()
        .and_then(|image| image.alt.clone())
        .unwrap_or_else(|| product.title.clone());
    let price = product.price_label();
    let clicked = product.clone();

    rsx! {
        div {
            class: get_product_card_class(badge.is_some(), clickable),
            onclick: move |_| {
                if clickable {
                    on_click.call(clicked.clone());
                }
            },

            if let Some(ref label) = badge {
                span { class: CssClasses::SLOT_BADGE, "{label}" }
            }

            if let Some(src) = image {
                img { class: CssClasses::PRODUCT_IMAGE, src: "{src}", alt: "{alt}" }
            } else {
                div { class: CssClasses::PRODUCT_IMAGE }
            }

            div { class: CssClasses::PRODUCT_TITLE, "{product.title}" }
            if let Some(price) = price {
                div { class: CssClasses::PRODUCT_PRICE, "{price}" }
            }
        }
    }
}
