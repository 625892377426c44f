// Core modules
pub mod auth_window; // Shopify認証ウィンドウ
pub mod config_manager;
pub mod controller; // 会話フローと状態遷移
pub mod dotted_glow;
pub mod models;
pub mod state;
pub mod traits; // バックエンド・認証の差し替えポイント
pub mod typewriter;
pub mod utils;

// Dioxus UI components
pub mod components;
pub mod hooks;
pub mod styles;

pub use controller::{ActionError, ControllerConfig, ShopGenieController};
pub use models::{ActiveTab, ChatMessage, ConversationStep};

pub use components::MainWindow;
