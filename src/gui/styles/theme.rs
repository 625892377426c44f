//! テーマとスタイルヘルパー

use crate::gui::models::{AlertLevel, ChatRole};

/// CSS クラス名の定数
pub struct CssClasses;

impl CssClasses {
    // アプリケーション
    pub const APP: &'static str = "app";
    pub const DARK: &'static str = "dark";
    pub const MAIN_WINDOW: &'static str = "main-window";
    pub const MAIN_CONTENT: &'static str = "main-content";

    // ナビバー
    pub const NAVBAR: &'static str = "navbar";
    pub const NAVBAR_BRAND: &'static str = "navbar-brand";
    pub const NAVBAR_ACTIONS: &'static str = "navbar-actions";
    pub const NAVBAR_HINT: &'static str = "navbar-hint";
    pub const SHOP_FORM: &'static str = "shop-form";
    pub const CONNECTED_LABEL: &'static str = "connected-label";

    // フォーム
    pub const FORM_INPUT: &'static str = "form-input";

    // ボタン
    pub const BTN: &'static str = "btn";
    pub const BTN_PRIMARY: &'static str = "btn-primary";
    pub const BTN_DANGER: &'static str = "btn-danger";
    pub const BTN_SUCCESS: &'static str = "btn-success";
    pub const BTN_SECONDARY: &'static str = "btn-secondary";
    pub const BTN_GROUP: &'static str = "btn-group";
    pub const SPINNER: &'static str = "spinner";

    // チャット
    pub const CHAT_PANEL: &'static str = "chat-panel";
    pub const WELCOME: &'static str = "welcome";
    pub const WELCOME_BACKGROUND: &'static str = "welcome-background";
    pub const MESSAGE_LIST: &'static str = "message-list";
    pub const CHAT_MESSAGE: &'static str = "chat-message";
    pub const MESSAGE_BUBBLE: &'static str = "message-bubble";
    pub const MESSAGE_TIMESTAMP: &'static str = "message-timestamp";
    pub const TYPING_INDICATOR: &'static str = "typing-indicator";
    pub const PROMPT_FORM: &'static str = "prompt-form";

    // 商品
    pub const PRODUCT_GRID: &'static str = "product-grid";
    pub const PRODUCT_CARD: &'static str = "product-card";
    pub const PRODUCT_IMAGE: &'static str = "product-image";
    pub const PRODUCT_TITLE: &'static str = "product-title";
    pub const PRODUCT_PRICE: &'static str = "product-price";
    pub const SLOT_BADGE: &'static str = "slot-badge";

    // プレビュー
    pub const PANEL: &'static str = "panel";
    pub const PANEL_TITLE: &'static str = "panel-title";
    pub const PREVIEW_CARD: &'static str = "preview-card";
    pub const PREVIEW_FIELD: &'static str = "preview-field";
    pub const PREVIEW_LABEL: &'static str = "preview-label";
    pub const HIGHLIGHT_DISCOUNT: &'static str = "highlight-discount";
    pub const HIGHLIGHT_BANNER: &'static str = "highlight-banner";
    pub const EMPTY_STATE: &'static str = "empty-state";

    // 通知
    pub const ALERT: &'static str = "alert";
}

/// 発言者に応じたCSSクラスを取得
pub fn get_message_class(role: ChatRole) -> String {
    let role_class = match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    };
    format!("{} {}", CssClasses::CHAT_MESSAGE, role_class)
}

/// 通知の重要度に応じたCSSクラスを取得
pub fn get_alert_class(level: AlertLevel) -> String {
    let level_class = match level {
        AlertLevel::Success => "success",
        AlertLevel::Warning => "warning",
        AlertLevel::Error => "error",
    };
    format!("{} {}", CssClasses::ALERT, level_class)
}

/// 商品カードのCSSクラスを取得
pub fn get_product_card_class(selected: bool, clickable: bool) -> String {
    let mut classes = CssClasses::PRODUCT_CARD.to_string();
    if selected {
        classes.push_str(" selected");
    }
    if clickable {
        classes.push_str(" clickable");
    }
    classes
}

/// ボタンの状態に応じたCSSクラスを取得
pub fn get_button_class(variant: &str, disabled: bool) -> String {
    let base_class = CssClasses::BTN;
    let variant_class = match variant {
        "primary" => CssClasses::BTN_PRIMARY,
        "danger" => CssClasses::BTN_DANGER,
        "success" => CssClasses::BTN_SUCCESS,
        "secondary" => CssClasses::BTN_SECONDARY,
        _ => CssClasses::BTN_PRIMARY,
    };

    let mut classes = format!("{} {}", base_class, variant_class);
    if disabled {
        classes.push_str(" disabled");
    }
    classes
}

/// CSSの埋め込み用ヘルパー
pub fn get_embedded_css() -> &'static str {
    include_str!("theme.css")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_class() {
        assert_eq!(get_button_class("danger", false), "btn btn-danger");
        assert_eq!(get_button_class("unknown", true), "btn btn-primary disabled");
    }

    #[test]
    fn test_state_classes() {
        assert_eq!(get_message_class(ChatRole::User), "chat-message user");
        assert_eq!(get_alert_class(AlertLevel::Warning), "alert warning");
        assert_eq!(get_product_card_class(true, true), "product-card selected clickable");
    }

    #[test]
    fn test_embedded_css_has_dark_theme() {
        let css = get_embedded_css();
        assert!(css.contains(".dark"));
        assert!(css.contains(".product-card"));
    }
}
