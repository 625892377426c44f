use serde::{Deserialize, Serialize};

use crate::api::{Bundle, Product, ProductId};

/// チャットの発言者
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// バンドルプレビューとしてチャットに添付される内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundlePreview {
    pub product_a: Product,
    pub product_b: Product,
    pub bundle: Bundle,
}

/// チャットメッセージの添付物
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum ChatPayload {
    #[default]
    Text,
    ProductSelection {
        products: Vec<Product>,
    },
    BundlePreview(Box<BundlePreview>),
}

impl ChatPayload {
    pub fn as_string(&self) -> String {
        match self {
            ChatPayload::Text => "text".to_string(),
            ChatPayload::ProductSelection { .. } => "product-selection".to_string(),
            ChatPayload::BundlePreview(_) => "bundle-preview".to_string(),
        }
    }
}

/// GUI用のチャットメッセージ構造体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub timestamp: String,
    pub role: ChatRole,
    pub content: String,
    pub payload: ChatPayload,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>, payload: ChatPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: crate::gui::utils::format_timestamp(),
            role,
            content: content.into(),
            payload,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content, ChatPayload::Text)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content, ChatPayload::Text)
    }

    pub fn product_selection(content: impl Into<String>, products: Vec<Product>) -> Self {
        Self::new(
            ChatRole::Assistant,
            content,
            ChatPayload::ProductSelection { products },
        )
    }

    pub fn bundle_preview(content: impl Into<String>, preview: BundlePreview) -> Self {
        Self::new(
            ChatRole::Assistant,
            content,
            ChatPayload::BundlePreview(Box::new(preview)),
        )
    }

    pub fn is_assistant(&self) -> bool {
        self.role == ChatRole::Assistant
    }
}

/// 会話フローの現在位置
///
/// 商品クリックがどのバックエンド呼び出しに繋がるかを決める。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationStep {
    #[default]
    Initial,
    AwaitingBundleProductA,
    AwaitingBundleProductB {
        product_a: ProductId,
    },
    AwaitingOptimizeProduct,
    Complete,
}

impl ConversationStep {
    /// 商品グリッドのクリックを受け付ける状態か
    pub fn accepts_product_click(&self) -> bool {
        matches!(
            self,
            ConversationStep::AwaitingBundleProductA
                | ConversationStep::AwaitingBundleProductB { .. }
                | ConversationStep::AwaitingOptimizeProduct
        )
    }
}

/// アクティブなタブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Assistant,
    Optimize,
    Bundles,
}

impl std::fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveTab::Assistant => write!(f, "Assistant"),
            ActiveTab::Optimize => write!(f, "Launch Assets"),
            ActiveTab::Bundles => write!(f, "Bundles"),
        }
    }
}

impl ActiveTab {
    pub fn icon(&self) -> &'static str {
        match self {
            ActiveTab::Assistant => "💬",
            ActiveTab::Optimize => "🚀",
            ActiveTab::Bundles => "🎁",
        }
    }

    pub fn all() -> [ActiveTab; 3] {
        [ActiveTab::Assistant, ActiveTab::Optimize, ActiveTab::Bundles]
    }
}

/// 通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Warning,
    Error,
}

/// 画面上部に表示する通知（ブラウザのalert相当）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub body: String,
    /// 順序付きの手順（スコープ承認エラーなど）
    pub steps: Vec<String>,
}

impl Alert {
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            title: title.into(),
            body: body.into(),
            steps: Vec::new(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            title: title.into(),
            body: body.into(),
            steps: Vec::new(),
        }
    }

    pub fn scope_approval(message: impl Into<String>, instructions: Vec<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            title: "⚠️ Scope Approval Required".to_string(),
            body: message.into(),
            steps: instructions,
        }
    }

    /// 本文と手順を1つのテキストにまとめる
    pub fn full_text(&self) -> String {
        let mut text = self.body.clone();
        if !self.steps.is_empty() {
            text.push_str("\n\n");
            text.push_str(&self.steps.join("\n"));
        }
        text
    }
}

/// 実行中の処理（対応するボタンを無効化する単位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    Connecting,
    CheckingConnection,
    Disconnecting,
    LoadingProducts,
    Generating,
    Applying,
    GeneratingBundle,
    CreatingBundle,
    Thinking,
    Diagnosing,
}
