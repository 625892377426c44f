//! 統合状態管理モジュール
//!
//! セッション・商品・生成物・会話の状態を一元管理

pub mod app_state;

pub use app_state::{AppState, BundleDraft, OptimizeDraft, SelectionChange, SessionState};
