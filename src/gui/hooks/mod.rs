//! Dioxusカスタムフック

pub mod use_shop_genie;
pub mod use_typewriter;

pub use use_shop_genie::{use_shop_genie, use_shop_genie_provider, ShopGenieHandle};
pub use use_typewriter::use_typewriter;
