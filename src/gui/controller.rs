//! ShopGenieコントローラ
//!
//! 画面状態（`AppState`）を単独で所有し、型付きのアクションメソッドを公開する。
//! Dioxusのコンポーネントはアクションを呼び出し、状態のリビジョン通知を
//! 受け取って再描画するだけで、状態を直接書き換えない。
//!
//! - ロックは `.await` をまたいで保持しない
//! - 各アクションは `ActivityGuard` で実行中フラグを立て、成否に関わらず解除する
//! - 追い越された応答はキャンセルせず、完了時点の状態に適用する

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiError, BackendDiagnostic, Product, ProductId, ShowSection, Suggestion};
use crate::gui::models::{
    Activity, ActiveTab, Alert, BundlePreview, ChatMessage, ConversationStep,
};
use crate::gui::state::{AppState, OptimizeDraft, SelectionChange};
use crate::gui::traits::{AuthNavigator, ShopBackend};
use crate::shop::{normalize_shop_domain, strip_query, OAuthCallback, ShopDomainError};

/// 商品一覧の既定取得件数
pub const DEFAULT_PRODUCT_LIMIT: u32 = 10;

/// アクション実行時のエラー
#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    #[error("Please connect your Shopify store first")]
    NotConnected,

    #[error(transparent)]
    InvalidShop(#[from] ShopDomainError),

    #[error("No product selected")]
    NoProductSelected,

    #[error("Please select two different products")]
    SameProduct,

    #[error("Nothing to apply, generate launch assets first")]
    NothingToApply,

    #[error("Select two products and generate a bundle first")]
    BundleIncomplete,

    #[error("{0:?} is already in progress")]
    Busy(Activity),

    #[error("Authorization window was closed before completing")]
    AuthorizationCancelled,

    #[error("Authorization failed: {0}")]
    Navigation(String),

    #[error("Unexpected authorization callback: {0}")]
    UnexpectedCallback(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// コントローラ設定
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub product_limit: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            product_limit: DEFAULT_PRODUCT_LIMIT,
        }
    }
}

struct Shared {
    state: Mutex<AppState>,
    revision: watch::Sender<u64>,
}

impl Shared {
    fn notify(&self) {
        self.revision.send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

/// 実行中フラグのRAIIガード
pub struct ActivityGuard {
    shared: Arc<Shared>,
    activity: Activity,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.shared.state.lock().busy.remove(&self.activity);
        self.shared.notify();
        debug!(activity = ?self.activity, "🏁 Activity finished");
    }
}

/// 画面状態を所有するコントローラ
#[derive(Clone)]
pub struct ShopGenieController {
    shared: Arc<Shared>,
    backend: Arc<dyn ShopBackend>,
    navigator: Arc<dyn AuthNavigator>,
    config: ControllerConfig,
}

impl ShopGenieController {
    pub fn new(
        backend: Arc<dyn ShopBackend>,
        navigator: Arc<dyn AuthNavigator>,
        config: ControllerConfig,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(AppState::default()),
                revision,
            }),
            backend,
            navigator,
            config,
        }
    }

    /// 現在の状態のスナップショット
    pub fn snapshot(&self) -> AppState {
        self.shared.state.lock().clone()
    }

    /// 状態変更の通知を購読
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.shared.state.lock())
    }

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let result = {
            let mut state = self.shared.state.lock();
            f(&mut state)
        };
        self.shared.notify();
        result
    }

    /// 実行中フラグを立てる。既に実行中なら `ActionError::Busy`
    pub fn begin(&self, activity: Activity) -> Result<ActivityGuard, ActionError> {
        {
            let mut state = self.shared.state.lock();
            if !state.busy.insert(activity) {
                debug!(activity = ?activity, "⏳ Activity already running, skipping");
                return Err(ActionError::Busy(activity));
            }
        }
        self.shared.notify();
        debug!(activity = ?activity, "▶️ Activity started");
        Ok(ActivityGuard {
            shared: Arc::clone(&self.shared),
            activity,
        })
    }

    fn alert(&self, alert: Alert) {
        info!(title = %alert.title, "🔔 Alert raised");
        self.update(|state| state.alert = Some(alert));
    }

    /// APIエラーをアラートとして表示（スコープ承認は専用の案内）
    fn alert_api_error(&self, action: &str, error: &ApiError) {
        let alert = match error {
            ApiError::ScopeApprovalRequired {
                message,
                instructions,
            } => Alert::scope_approval(message.clone(), instructions.clone()),
            other => Alert::error(format!("Failed to {action}"), other.to_string()),
        };
        self.alert(alert);
    }

    fn alert_action_error(&self, action: &str, error: &ActionError) {
        match error {
            ActionError::Api(api) => self.alert_api_error(action, api),
            ActionError::Busy(_) => {}
            other => self.alert(Alert::error(format!("Failed to {action}"), other.to_string())),
        }
    }

    pub fn dismiss_alert(&self) {
        self.update(|state| state.alert = None);
    }

    pub fn set_active_tab(&self, tab: ActiveTab) {
        self.update(|state| state.active_tab = tab);
    }

    fn connected_shop(&self) -> Result<String, ActionError> {
        self.read(|state| {
            if state.session.connected && !state.session.shop.is_empty() {
                Ok(state.session.shop.clone())
            } else {
                Err(ActionError::NotConnected)
            }
        })
    }

    // ---------------------------------------------------------------------
    // セッション
    // ---------------------------------------------------------------------

    /// ストアを接続する
    ///
    /// 入力を正規化して認可URLを取得し、認可ページへ遷移する。
    /// 戻ってきたコールバックURLから接続状態を反映する。
    pub async fn connect(&self, shop_input: &str) -> Result<(), ActionError> {
        let result = self.connect_inner(shop_input).await;
        if let Err(error) = &result {
            warn!(error = %error, "❌ Connect failed");
            self.alert_action_error("connect", error);
        }
        result
    }

    async fn connect_inner(&self, shop_input: &str) -> Result<(), ActionError> {
        let shop = normalize_shop_domain(shop_input)?;
        let _guard = self.begin(Activity::Connecting)?;

        info!(shop = %shop, "🔗 Requesting install URL");
        self.update(|state| state.session.shop = shop.clone());

        let install_url = self.backend.install_url(&shop).await?;
        let callback = self
            .navigator
            .authorize(&install_url)
            .await
            .map_err(|e| ActionError::Navigation(e.to_string()))?
            .ok_or(ActionError::AuthorizationCancelled)?;

        if self.apply_callback_url(&callback) {
            Ok(())
        } else {
            Err(ActionError::UnexpectedCallback(strip_query(&callback)))
        }
    }

    /// ショップを直接設定する（起動時の指定など）。接続状態は確認し直すまで未接続
    pub fn set_shop(&self, shop_input: &str) -> Result<String, ActionError> {
        let shop = normalize_shop_domain(shop_input)?;
        self.update(|state| {
            if state.session.shop != shop {
                state.session.shop = shop.clone();
                state.session.connected = false;
            }
        });
        Ok(shop)
    }

    /// OAuthコールバックURLを一度だけ読み取り、クエリを除いたURLを表示位置として残す
    pub fn apply_callback_url(&self, url: &str) -> bool {
        let callback = OAuthCallback::parse(url);
        let location = strip_query(url);
        let applied = callback.is_some();

        self.update(|state| {
            if let Some(callback) = callback {
                info!(shop = %callback.shop, "✅ Store connected via OAuth callback");
                state.session.shop = callback.shop;
                state.session.connected = true;
            }
            state.session.location = Some(location);
        });

        applied
    }

    /// 接続状態を確認する。失敗時は未接続として扱う
    ///
    /// 確認中にショップが変わった場合は古い結果を捨て、新しいショップを確認し直す。
    /// 実行中に呼ばれた確認は、実行中の確認がこの再確認で引き受ける。
    pub async fn check_connection(&self) {
        let mut shop = self.read(|state| state.session.shop.clone());
        if shop.is_empty() {
            return;
        }
        let Ok(_guard) = self.begin(Activity::CheckingConnection) else {
            return;
        };

        loop {
            let connected = match self.backend.connection_status(&shop).await {
                Ok(connected) => connected,
                Err(error) => {
                    debug!(shop = %shop, error = %error, "Connection check failed, treating as disconnected");
                    false
                }
            };

            let changed_to = self.update(|state| {
                if state.session.shop == shop {
                    state.session.connected = connected;
                    None
                } else {
                    Some(state.session.shop.clone())
                }
            });

            match changed_to {
                Some(next) if !next.is_empty() => {
                    debug!(previous = %shop, shop = %next, "🔁 Shop changed during check, checking again");
                    shop = next;
                }
                _ => break,
            }
        }
    }

    /// ログアウトしてローカルの商品・生成物をすべて破棄する
    ///
    /// 失敗時はアラートのみで、ローカル状態は変更しない。
    pub async fn disconnect(&self) -> Result<(), ActionError> {
        let shop = self.read(|state| state.session.shop.clone());
        if shop.is_empty() {
            return Ok(());
        }
        let _guard = self.begin(Activity::Disconnecting)?;

        match self.backend.logout(&shop).await {
            Ok(()) => {
                info!(shop = %shop, "👋 Logged out");
                self.update(|state| {
                    state.session.connected = false;
                    state.session.shop.clear();
                    state.clear_catalog();
                    state.step = ConversationStep::Initial;
                });
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "❌ Logout failed");
                self.alert(Alert::error("Failed to logout", error.to_string()));
                Err(error.into())
            }
        }
    }

    // ---------------------------------------------------------------------
    // 商品一覧
    // ---------------------------------------------------------------------

    async fn fetch_products(&self) -> Result<Vec<Product>, ActionError> {
        let shop = self.connected_shop()?;
        let _guard = self.begin(Activity::LoadingProducts)?;

        let products = self
            .backend
            .products(&shop, self.config.product_limit)
            .await?;
        info!(count = products.len(), "📦 Products loaded");

        self.update(|state| state.products = products.clone());
        Ok(products)
    }

    /// 商品一覧を読み込む（成功時は一覧を置き換える。自動リトライはしない）
    pub async fn load_products(&self) -> Result<(), ActionError> {
        match self.fetch_products().await {
            Ok(_) => Ok(()),
            Err(error) => {
                warn!(error = %error, "❌ Failed to load products");
                self.alert_action_error("load products", &error);
                Err(error)
            }
        }
    }

    async fn ensure_products(&self) -> Result<Vec<Product>, ActionError> {
        let products = self.read(|state| state.products.clone());
        if products.is_empty() {
            self.fetch_products().await
        } else {
            Ok(products)
        }
    }

    // ---------------------------------------------------------------------
    // ローンチ素材フロー
    // ---------------------------------------------------------------------

    /// 素材生成の対象商品を選ぶ。バンドル側の選択は破棄する
    pub fn select_optimize_product(&self, product_id: Option<ProductId>) {
        self.update(|state| {
            if state.optimize.selected != product_id {
                // 提案は生成元の商品にだけ適用できる
                state.optimize.selected = product_id;
                state.optimize.suggestion = None;
                state.bundle.reset();
            }
        });
    }

    async fn request_generate(&self, product_id: ProductId) -> Result<Suggestion, ActionError> {
        let shop = self.connected_shop()?;
        let _guard = self.begin(Activity::Generating)?;

        let response = self.backend.generate(&shop, product_id).await?;
        info!(product_id = %product_id, "✨ Launch assets generated");

        let suggestion = response.suggestion;
        self.update(|state| {
            state.optimize.selected = Some(product_id);
            state.optimize.suggestion = Some(suggestion.clone());
        });
        Ok(suggestion)
    }

    /// 選択中の商品のローンチ素材を生成する。失敗時は既存の提案を残す
    pub async fn generate(&self) -> Result<(), ActionError> {
        let result = match self.read(|state| state.optimize.selected) {
            Some(product_id) => self.request_generate(product_id).await.map(|_| ()),
            None => Err(ActionError::NoProductSelected),
        };
        if let Err(error) = &result {
            warn!(error = %error, "❌ Generation failed");
            self.alert_action_error("generate", error);
        }
        result
    }

    /// 現在の提案をストアへ反映する。成功すると提案は消費される
    pub async fn apply(&self) -> Result<(), ActionError> {
        let result = self.apply_inner().await;
        match &result {
            Ok(()) => self.alert(Alert::success(
                "Applied successfully!",
                "Check your Shopify store.",
            )),
            Err(error) => {
                warn!(error = %error, "❌ Apply failed");
                self.alert_action_error("apply", error);
            }
        }
        result
    }

    async fn apply_inner(&self) -> Result<(), ActionError> {
        let shop = self.connected_shop()?;
        let (product_id, suggestion) = self.read(|state| {
            (state.optimize.selected, state.optimize.suggestion.clone())
        });
        let product_id = product_id.ok_or(ActionError::NoProductSelected)?;
        let suggestion = suggestion.ok_or(ActionError::NothingToApply)?;
        let _guard = self.begin(Activity::Applying)?;

        self.backend.apply(&shop, product_id, &suggestion).await?;
        info!(product_id = %product_id, "🛒 Suggestion applied to store");

        self.update(|state| state.optimize.suggestion = None);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // バンドルフロー
    // ---------------------------------------------------------------------

    /// グリッド上の商品クリック（選択のトグル）。素材生成側の状態は破棄する
    pub fn toggle_bundle_product(&self, product_id: ProductId) -> SelectionChange {
        self.update(|state| {
            let change = state.bundle.toggle(product_id);
            if change != SelectionChange::Ignored {
                state.optimize = OptimizeDraft::default();
            }
            debug!(product_id = %product_id, change = ?change, "🧺 Bundle selection changed");
            change
        })
    }

    async fn request_bundle(
        &self,
        product_a_id: ProductId,
        product_b_id: ProductId,
    ) -> Result<BundlePreview, ActionError> {
        if product_a_id == product_b_id {
            return Err(ActionError::SameProduct);
        }
        let shop = self.connected_shop()?;
        let _guard = self.begin(Activity::GeneratingBundle)?;

        let response = self
            .backend
            .generate_bundle(&shop, product_a_id, product_b_id)
            .await?;
        info!(
            product_a = %product_a_id,
            product_b = %product_b_id,
            title = %response.bundle.title,
            "🎁 Bundle generated"
        );

        let preview = BundlePreview {
            product_a: response.product_a,
            product_b: response.product_b,
            bundle: response.bundle,
        };
        self.update(|state| {
            state.bundle.product_a_id = Some(product_a_id);
            state.bundle.product_b_id = Some(product_b_id);
            state.bundle.product_a = Some(preview.product_a.clone());
            state.bundle.product_b = Some(preview.product_b.clone());
            state.bundle.bundle = Some(preview.bundle.clone());
        });
        Ok(preview)
    }

    /// グリッドで選んだ2商品からバンドルを生成する
    pub async fn generate_bundle(&self) -> Result<(), ActionError> {
        let result = match self.read(|state| state.bundle.selected_pair()) {
            Some((a, b)) => self.request_bundle(a, b).await.map(|_| ()),
            None => Err(ActionError::BundleIncomplete),
        };
        if let Err(error) = &result {
            warn!(error = %error, "❌ Bundle generation failed");
            self.alert_action_error("generate bundle", error);
        }
        result
    }

    /// 生成済みバンドルをストアに作成し、成功したらバンドル状態を初期化する
    pub async fn create_bundle(&self) -> Result<(), ActionError> {
        let result = self.create_bundle_inner().await;
        match &result {
            Ok(title) => {
                self.alert(Alert::success(
                    "Bundle created successfully!",
                    format!("\"{title}\" is now in your Shopify store."),
                ));
            }
            Err(error) => {
                warn!(error = %error, "❌ Bundle creation failed");
                self.alert_action_error("create bundle", error);
            }
        }
        result.map(|_| ())
    }

    async fn create_bundle_inner(&self) -> Result<String, ActionError> {
        let shop = self.connected_shop()?;
        let draft = self.read(|state| state.bundle.clone());
        let (Some(product_a), Some(product_b), Some(bundle)) =
            (draft.product_a, draft.product_b, draft.bundle)
        else {
            return Err(ActionError::BundleIncomplete);
        };
        let _guard = self.begin(Activity::CreatingBundle)?;

        self.backend
            .create_bundle(&shop, &product_a, &product_b, &bundle)
            .await?;
        info!(title = %bundle.title, "🎉 Bundle created in store");

        self.update(|state| {
            state.bundle.reset();
            if state.step == ConversationStep::Complete {
                state.push_message(ChatMessage::assistant(format!(
                    "🎉 Your bundle \"{}\" has been created in your store! What would you like to do next?",
                    bundle.title
                )));
                state.step = ConversationStep::Initial;
            }
        });
        Ok(bundle.title)
    }

    // ---------------------------------------------------------------------
    // 会話フロー
    // ---------------------------------------------------------------------

    /// 自然文のプロンプトを処理し、意図に応じて会話ステップを進める
    pub async fn handle_agent_prompt(&self, text: &str) -> Result<(), ActionError> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Ok(());
        }
        let _guard = self.begin(Activity::Thinking)?;

        self.update(|state| state.push_message(ChatMessage::user(prompt)));

        let intent = match self.backend.agent_intent(prompt).await {
            Ok(intent) => intent,
            Err(error) => {
                warn!(error = %error, "❌ Intent request failed");
                self.update(|state| {
                    state.push_message(ChatMessage::assistant(format!(
                        "Sorry, I couldn't process that request: {error}"
                    )))
                });
                return Err(error.into());
            }
        };
        info!(section = ?intent.show_section, "🧭 Intent classified");

        let next_step = match intent.show_section {
            ShowSection::Bundle => ConversationStep::AwaitingBundleProductA,
            ShowSection::Optimize => ConversationStep::AwaitingOptimizeProduct,
            ShowSection::Other(_) | ShowSection::None => {
                self.update(|state| {
                    state.step = ConversationStep::Initial;
                    state.push_message(ChatMessage::assistant(intent.message));
                });
                return Ok(());
            }
        };

        let products = match self.ensure_products().await {
            Ok(products) => products,
            Err(error) => {
                let reply = match &error {
                    ActionError::NotConnected => {
                        "Please connect your Shopify store first using the button at the top right."
                            .to_string()
                    }
                    ActionError::Api(ApiError::ScopeApprovalRequired {
                        message,
                        instructions,
                    }) => Alert::scope_approval(message.clone(), instructions.clone()).full_text(),
                    other => format!("Failed to load products: {other}"),
                };
                self.update(|state| {
                    state.step = ConversationStep::Initial;
                    state.push_message(ChatMessage::assistant(reply));
                });
                return Err(error);
            }
        };

        self.update(|state| {
            if products.is_empty() {
                state.step = ConversationStep::Initial;
                state.push_message(ChatMessage::assistant(
                    "I couldn't find any products in your store yet.",
                ));
                return;
            }

            // 新しいフローを選んだら、もう一方の途中の選択は破棄する
            match next_step {
                ConversationStep::AwaitingBundleProductA => {
                    state.optimize = OptimizeDraft::default();
                    state.bundle.reset();
                }
                _ => {
                    state.bundle.reset();
                    state.optimize.selected = None;
                }
            }
            state.step = next_step;
            state.push_message(ChatMessage::product_selection(intent.message, products));
        });
        Ok(())
    }

    /// チャット内の商品グリッドのクリック
    ///
    /// 結果は現在の会話ステップによって決まる。受け付けない状態では何もしない。
    pub async fn handle_product_click(&self, product: Product) -> Result<(), ActionError> {
        let step = self.read(|state| state.step.clone());
        debug!(step = ?step, product_id = %product.id, "🖱️ Product clicked in chat");

        match step {
            ConversationStep::Initial | ConversationStep::Complete => {
                debug!("Product click ignored outside of a selection step");
                Ok(())
            }
            ConversationStep::AwaitingBundleProductA => {
                self.update(|state| {
                    state.push_message(ChatMessage::user(format!("Selected: {}", product.title)));
                    state.bundle.reset();
                    state.bundle.product_a_id = Some(product.id);
                    state.step = ConversationStep::AwaitingBundleProductB {
                        product_a: product.id,
                    };
                    let remaining = state
                        .products
                        .iter()
                        .filter(|candidate| candidate.id != product.id)
                        .cloned()
                        .collect();
                    state.push_message(ChatMessage::product_selection(
                        "Great choice! Now select the second product for your bundle.",
                        remaining,
                    ));
                });
                Ok(())
            }
            ConversationStep::AwaitingBundleProductB { product_a } => {
                if product.id == product_a {
                    self.update(|state| {
                        state.push_message(ChatMessage::assistant(format!(
                            "\"{}\" is already your first product. Please pick a different one.",
                            product.title
                        )))
                    });
                    return Ok(());
                }

                self.update(|state| {
                    state.push_message(ChatMessage::user(format!("Selected: {}", product.title)));
                    state.bundle.product_b_id = Some(product.id);
                    state.step = ConversationStep::Complete;
                });

                match self.request_bundle(product_a, product.id).await {
                    Ok(preview) => {
                        self.update(|state| {
                            state.push_message(ChatMessage::bundle_preview(
                                "Here's your bundle! Review it and create it in your store when you're ready.",
                                preview,
                            ))
                        });
                        Ok(())
                    }
                    Err(error) => {
                        warn!(error = %error, "❌ Bundle generation failed in chat");
                        // 2つ目の選択からやり直せるように戻す
                        self.update(|state| {
                            state.bundle.product_b_id = None;
                            state.step = ConversationStep::AwaitingBundleProductB { product_a };
                            state.push_message(ChatMessage::assistant(format!(
                                "Failed to generate bundle: {error}\nPlease select the second product again."
                            )))
                        });
                        Err(error)
                    }
                }
            }
            ConversationStep::AwaitingOptimizeProduct => {
                self.update(|state| {
                    state.push_message(ChatMessage::user(format!("Selected: {}", product.title)));
                    state.bundle.reset();
                    state.optimize.selected = Some(product.id);
                    state.step = ConversationStep::Complete;
                });

                match self.request_generate(product.id).await {
                    Ok(_) => {
                        self.update(|state| {
                            state.push_message(ChatMessage::assistant(format!(
                                "Here are optimized launch assets for \"{}\". Review the preview in the Launch Assets tab and apply them to your store.",
                                product.title
                            )));
                            state.active_tab = ActiveTab::Optimize;
                        });
                        Ok(())
                    }
                    Err(error) => {
                        warn!(error = %error, "❌ Generation failed in chat");
                        self.update(|state| {
                            state.push_message(ChatMessage::assistant(format!(
                                "Failed to generate launch assets: {error}"
                            )))
                        });
                        Err(error)
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // 診断
    // ---------------------------------------------------------------------

    /// AIバックエンドの疎通確認結果をアラートで表示する
    pub async fn diagnose(&self) -> Result<(), ActionError> {
        let _guard = self.begin(Activity::Diagnosing)?;

        match self.backend.diagnose().await {
            Ok(diagnostic) => {
                self.alert(diagnostic_alert(&diagnostic));
                Ok(())
            }
            Err(error) => {
                self.alert(Alert::error("❌ AI Backend Test Failed", error.to_string()));
                Err(error.into())
            }
        }
    }
}

fn diagnostic_alert(diagnostic: &BackendDiagnostic) -> Alert {
    if diagnostic.success {
        let tokens = diagnostic
            .usage
            .as_ref()
            .and_then(|usage| usage.output_tokens)
            .map(|tokens| tokens.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        Alert::success(
            "✅ AI Backend Test Successful!",
            format!(
                "Response: {}\nModel: {}\nTokens used: {}",
                diagnostic.message.as_deref().unwrap_or(""),
                diagnostic.model.as_deref().unwrap_or("unknown"),
                tokens
            ),
        )
    } else {
        Alert::error(
            "❌ AI Backend Test Failed",
            diagnostic
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        )
    }
}
