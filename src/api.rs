pub mod client; // バックエンドHTTPクライアント
pub mod error;
pub mod types; // リクエスト/レスポンス型

pub use client::{BackendClient, DEFAULT_BACKEND_URL};
pub use error::ApiError;
pub use types::*;
