//! アプリケーション状態
//!
//! 画面に表示される一時的な状態をすべてここに集約する。
//! 永続化は行わず、ウィンドウを閉じると破棄される。

use std::collections::HashSet;

use crate::api::{Bundle, Product, ProductId, Suggestion};
use crate::gui::models::{Activity, ActiveTab, Alert, ChatMessage, ConversationStep};

/// ストア接続状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub shop: String,
    pub connected: bool,
    /// 表示中のロケーション（コールバックのクエリは除去済み）
    pub location: Option<String>,
}

/// ローンチ素材生成フローの下書き
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizeDraft {
    pub selected: Option<ProductId>,
    pub suggestion: Option<Suggestion>,
}

/// バンドル作成フローの下書き
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleDraft {
    pub product_a_id: Option<ProductId>,
    pub product_b_id: Option<ProductId>,
    pub product_a: Option<Product>,
    pub product_b: Option<Product>,
    pub bundle: Option<Bundle>,
}

/// グリッド上のクリックで起きた選択の変化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    SelectedA,
    SelectedB,
    DeselectedA,
    DeselectedB,
    /// 両枠が埋まっているため無視
    Ignored,
}

impl BundleDraft {
    pub fn is_empty(&self) -> bool {
        *self == BundleDraft::default()
    }

    /// 選択のトグル
    ///
    /// 選択済みの商品は解除し、未選択ならA→Bの順で空いている枠に入れる。
    /// 選択が変わった場合は生成済みのバンドルを破棄する。
    pub fn toggle(&mut self, id: ProductId) -> SelectionChange {
        let change = if self.product_a_id == Some(id) {
            self.product_a_id = None;
            SelectionChange::DeselectedA
        } else if self.product_b_id == Some(id) {
            self.product_b_id = None;
            SelectionChange::DeselectedB
        } else if self.product_a_id.is_none() {
            self.product_a_id = Some(id);
            SelectionChange::SelectedA
        } else if self.product_b_id.is_none() {
            self.product_b_id = Some(id);
            SelectionChange::SelectedB
        } else {
            SelectionChange::Ignored
        };

        if change != SelectionChange::Ignored {
            self.clear_generated();
        }
        change
    }

    /// 選択中の2商品（両方揃っている場合のみ）
    pub fn selected_pair(&self) -> Option<(ProductId, ProductId)> {
        match (self.product_a_id, self.product_b_id) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn clear_generated(&mut self) {
        self.product_a = None;
        self.product_b = None;
        self.bundle = None;
    }

    pub fn reset(&mut self) {
        *self = BundleDraft::default();
    }

    /// 表示用の見積価格
    pub fn estimated_price(&self) -> Option<f64> {
        match (&self.bundle, &self.product_a, &self.product_b) {
            (Some(bundle), Some(a), Some(b)) => bundle.estimated_price(a, b),
            _ => None,
        }
    }
}

/// アプリケーション全体の状態
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub products: Vec<Product>,
    pub optimize: OptimizeDraft,
    pub bundle: BundleDraft,
    /// 追加のみ。挿入順がそのまま表示順
    pub chat: Vec<ChatMessage>,
    pub step: ConversationStep,
    pub busy: HashSet<Activity>,
    pub alert: Option<Alert>,
    pub active_tab: ActiveTab,
}

impl AppState {
    pub fn is_busy(&self, activity: Activity) -> bool {
        self.busy.contains(&activity)
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        crate::gui::utils::dump_chat_message(&message, "push_message");
        self.chat.push(message);
    }

    /// 最新のアシスタント発言
    pub fn last_assistant_message(&self) -> Option<&ChatMessage> {
        self.chat.iter().rev().find(|message| message.is_assistant())
    }

    /// 商品・生成物を破棄する（チャット履歴は残す）
    pub fn clear_catalog(&mut self) {
        self.products.clear();
        self.optimize = OptimizeDraft::default();
        self.bundle.reset();
    }
}
