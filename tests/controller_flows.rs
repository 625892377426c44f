//! コントローラの会話フロー・状態遷移の統合テスト
//!
//! HTTPやウィンドウの代わりに記録用のフェイク実装を差し込み、
//! アクションごとの状態変化とバックエンド呼び出しを確認する。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

use shopgenie::api::{
    ApiError, BackendDiagnostic, Bundle, GenerateBundleResponse, GenerateResponse,
    IntentResponse, Product, ProductId, ShowSection, Suggestion,
};
use shopgenie::gui::models::{
    Activity, ActiveTab, AlertLevel, ChatPayload, ChatRole, ConversationStep,
};
use shopgenie::gui::state::SelectionChange;
use shopgenie::gui::traits::{AuthNavigator, ShopBackend};
use shopgenie::gui::{ActionError, ControllerConfig, ShopGenieController};

const SHOP: &str = "demo.myshopify.com";
const CALLBACK: &str = "http://localhost:3000/?shop=demo.myshopify.com&connected=true";

// ---------------------------------------------------------------------------
// フェイク実装
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Failure {
    Status(u16, &'static str),
    ScopeApproval,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Status(status, detail) => ApiError::Status {
                status: *status,
                detail: detail.to_string(),
            },
            Failure::ScopeApproval => ApiError::ScopeApprovalRequired {
                message: "Product access needs approval.".to_string(),
                instructions: vec![
                    "Open the Partner Dashboard".to_string(),
                    "Request protected data access".to_string(),
                    "Reconnect the store".to_string(),
                ],
            },
        }
    }
}

struct FakeBackend {
    calls: Mutex<Vec<String>>,
    products: Mutex<Vec<Product>>,
    connected: Mutex<bool>,
    intent: Mutex<(String, ShowSection)>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            products: Mutex::new(vec![
                product(1, "Sunrise Mug", "20.00"),
                product(2, "Dark Roast Beans", "10.00"),
                product(3, "Pour Over Kit", "35.00"),
            ]),
            connected: Mutex::new(true),
            intent: Mutex::new(("Sure!".to_string(), ShowSection::None)),
            failures: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    fn fail(&self, operation: &'static str, failure: Failure) {
        self.failures.lock().insert(operation, failure);
    }

    fn recover(&self, operation: &'static str) {
        self.failures.lock().remove(operation);
    }

    fn gate(&self, operation: &'static str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(operation, Arc::clone(&notify));
        notify
    }

    fn ungate(&self, operation: &'static str) {
        self.gates.lock().remove(operation);
    }

    fn set_intent(&self, message: &str, section: ShowSection) {
        *self.intent.lock() = (message.to_string(), section);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(operation))
            .count()
    }

    async fn enter(&self, call: String, operation: &'static str) -> Result<(), ApiError> {
        self.calls.lock().push(call);
        let gate = self.gates.lock().get(operation).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let failure = self.failures.lock().get(operation).cloned();
        match failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ShopBackend for FakeBackend {
    async fn install_url(&self, shop: &str) -> Result<String, ApiError> {
        self.enter(format!("install_url {shop}"), "install_url").await?;
        Ok(format!("https://{shop}/admin/oauth/authorize"))
    }

    async fn connection_status(&self, shop: &str) -> Result<bool, ApiError> {
        self.enter(format!("connection_status {shop}"), "connection_status")
            .await?;
        Ok(*self.connected.lock())
    }

    async fn logout(&self, shop: &str) -> Result<(), ApiError> {
        self.enter(format!("logout {shop}"), "logout").await
    }

    async fn products(&self, shop: &str, limit: u32) -> Result<Vec<Product>, ApiError> {
        self.enter(format!("products {shop} {limit}"), "products").await?;
        Ok(self.products.lock().clone())
    }

    async fn generate(
        &self,
        _shop: &str,
        product_id: ProductId,
    ) -> Result<GenerateResponse, ApiError> {
        self.enter(format!("generate {product_id}"), "generate").await?;
        Ok(GenerateResponse {
            product: None,
            suggestion: suggestion(&format!("Launch {product_id}")),
        })
    }

    async fn apply(
        &self,
        _shop: &str,
        product_id: ProductId,
        suggestion: &Suggestion,
    ) -> Result<(), ApiError> {
        self.enter(format!("apply {product_id} {}", suggestion.title), "apply")
            .await
    }

    async fn generate_bundle(
        &self,
        _shop: &str,
        product_a_id: ProductId,
        product_b_id: ProductId,
    ) -> Result<GenerateBundleResponse, ApiError> {
        self.enter(
            format!("generate_bundle {product_a_id} {product_b_id}"),
            "generate_bundle",
        )
        .await?;
        let products = self.products.lock().clone();
        let find = |id: ProductId| {
            products
                .iter()
                .find(|product| product.id == id)
                .cloned()
                .unwrap_or_else(|| product(id.0, "Unknown", "1.00"))
        };
        Ok(GenerateBundleResponse {
            product_a: find(product_a_id),
            product_b: find(product_b_id),
            bundle: bundle("Morning Duo"),
        })
    }

    async fn create_bundle(
        &self,
        _shop: &str,
        product_a: &Product,
        product_b: &Product,
        bundle: &Bundle,
    ) -> Result<(), ApiError> {
        self.enter(
            format!(
                "create_bundle {} {} {}",
                product_a.id, product_b.id, bundle.title
            ),
            "create_bundle",
        )
        .await
    }

    async fn agent_intent(&self, prompt: &str) -> Result<IntentResponse, ApiError> {
        self.enter(format!("agent_intent {prompt}"), "agent_intent")
            .await?;
        let (message, show_section) = self.intent.lock().clone();
        Ok(IntentResponse {
            message,
            show_section,
        })
    }

    async fn diagnose(&self) -> Result<BackendDiagnostic, ApiError> {
        self.enter("diagnose".to_string(), "diagnose").await?;
        Ok(BackendDiagnostic {
            success: true,
            message: Some("pong".to_string()),
            model: Some("test-model".to_string()),
            usage: None,
            error: None,
        })
    }
}

struct FakeNavigator {
    opened: Mutex<Vec<String>>,
    callback: Mutex<Option<String>>,
}

impl FakeNavigator {
    fn returning(callback: Option<&str>) -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            callback: Mutex::new(callback.map(str::to_string)),
        }
    }
}

#[async_trait]
impl AuthNavigator for FakeNavigator {
    async fn authorize(&self, install_url: &str) -> anyhow::Result<Option<String>> {
        self.opened.lock().push(install_url.to_string());
        Ok(self.callback.lock().clone())
    }
}

fn product(id: i64, title: &str, price: &str) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "images": [{"src": format!("https://cdn.example/{id}.png")}],
        "variants": [{"price": price}]
    }))
    .unwrap()
}

fn suggestion(title: &str) -> Suggestion {
    serde_json::from_value(json!({
        "title": title,
        "description_html": "<p>Fresh.</p>",
        "bullets": ["One"],
        "tags": "new",
        "discount_code": "NEW10",
        "discount_percent": 10.0,
        "banner_copy": "Just landed"
    }))
    .unwrap()
}

fn bundle(title: &str) -> Bundle {
    serde_json::from_value(json!({
        "title": title,
        "description_html": "<p>Better together.</p>",
        "tags": ["bundle"],
        "bundle_price_percent_off": 15.0,
        "bundle_notes": "Gift ready"
    }))
    .unwrap()
}

fn setup_with(navigator: FakeNavigator) -> (ShopGenieController, Arc<FakeBackend>, Arc<FakeNavigator>) {
    let backend = Arc::new(FakeBackend::new());
    let navigator = Arc::new(navigator);
    let controller = ShopGenieController::new(
        backend.clone(),
        navigator.clone(),
        ControllerConfig { product_limit: 10 },
    );
    (controller, backend, navigator)
}

fn setup() -> (ShopGenieController, Arc<FakeBackend>) {
    let (controller, backend, _) = setup_with(FakeNavigator::returning(Some(CALLBACK)));
    (controller, backend)
}

/// OAuthコールバック経由で接続済みにしたコントローラ
fn connected() -> (ShopGenieController, Arc<FakeBackend>) {
    let (controller, backend) = setup();
    assert!(controller.apply_callback_url(CALLBACK));
    (controller, backend)
}

fn last_message(controller: &ShopGenieController) -> shopgenie::gui::ChatMessage {
    controller
        .read(|state| state.chat.last().cloned())
        .expect("chat should not be empty")
}

fn selection_ids(payload: &ChatPayload) -> Vec<i64> {
    match payload {
        ChatPayload::ProductSelection { products } => {
            products.iter().map(|product| product.id.0).collect()
        }
        other => panic!("expected product selection, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// 接続
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_opens_install_url_and_applies_callback() {
    let (controller, backend, navigator) = setup_with(FakeNavigator::returning(Some(CALLBACK)));

    controller.connect("Demo.com").await.unwrap();

    assert_eq!(backend.calls(), vec![format!("install_url {SHOP}")]);
    assert_eq!(
        navigator.opened.lock().clone(),
        vec![format!("https://{SHOP}/admin/oauth/authorize")]
    );
    let session = controller.read(|state| state.session.clone());
    assert!(session.connected);
    assert_eq!(session.shop, SHOP);
    assert_eq!(session.location.as_deref(), Some("http://localhost:3000/"));
    assert!(!controller.read(|state| state.is_busy(Activity::Connecting)));
}

#[tokio::test]
async fn connect_cancelled_leaves_store_disconnected() {
    let (controller, _backend, _) = setup_with(FakeNavigator::returning(None));

    let result = controller.connect("demo").await;

    assert!(matches!(result, Err(ActionError::AuthorizationCancelled)));
    controller.read(|state| {
        assert!(!state.session.connected);
        assert_eq!(state.alert.as_ref().map(|alert| alert.level), Some(AlertLevel::Error));
    });
}

#[tokio::test]
async fn connect_rejects_invalid_shop_without_calling_backend() {
    let (controller, backend) = setup();

    let result = controller.connect("bad name").await;

    assert!(matches!(result, Err(ActionError::InvalidShop(_))));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn callback_without_connected_flag_is_ignored() {
    let (controller, _backend) = setup();

    assert!(!controller.apply_callback_url("http://localhost:3000/?shop=demo.myshopify.com"));

    let session = controller.read(|state| state.session.clone());
    assert!(!session.connected);
    assert_eq!(session.location.as_deref(), Some("http://localhost:3000/"));
}

#[tokio::test]
async fn check_connection_rechecks_when_shop_changes_midway() {
    let (controller, backend) = setup();
    controller.set_shop("alpha").unwrap();
    let gate = backend.gate("connection_status");

    tokio::join!(controller.check_connection(), async {
        controller.set_shop("beta").unwrap();
        // 実行中の確認と重なった呼び出しは何もしない
        controller.check_connection().await;
        backend.ungate("connection_status");
        gate.notify_one();
    });

    let session = controller.read(|state| state.session.clone());
    assert_eq!(session.shop, "beta.myshopify.com");
    assert!(session.connected);
    assert_eq!(
        backend.calls(),
        vec![
            "connection_status alpha.myshopify.com",
            "connection_status beta.myshopify.com",
        ]
    );
    assert!(!controller.read(|state| state.is_busy(Activity::CheckingConnection)));
}

#[tokio::test]
async fn check_connection_result_for_previous_shop_is_not_applied() {
    let (controller, backend) = setup();
    controller.set_shop("alpha").unwrap();
    *backend.connected.lock() = true;
    let gate = backend.gate("connection_status");

    tokio::join!(controller.check_connection(), async {
        controller.set_shop("beta").unwrap();
        backend.ungate("connection_status");
        // beta は未接続
        *backend.connected.lock() = false;
        gate.notify_one();
    });

    let session = controller.read(|state| state.session.clone());
    assert_eq!(session.shop, "beta.myshopify.com");
    assert!(!session.connected);
}

#[tokio::test]
async fn check_connection_failure_means_disconnected() {
    let (controller, backend) = connected();
    backend.fail("connection_status", Failure::Status(500, "boom"));

    controller.check_connection().await;

    controller.read(|state| {
        assert!(!state.session.connected);
        assert!(state.alert.is_none());
    });
}

#[tokio::test]
async fn disconnect_failure_keeps_local_state() {
    let (controller, backend) = connected();
    controller.load_products().await.unwrap();
    backend.fail("logout", Failure::Status(500, "Session store down"));

    let result = controller.disconnect().await;

    assert!(result.is_err());
    controller.read(|state| {
        assert!(state.session.connected);
        assert_eq!(state.products.len(), 3);
        let alert = state.alert.as_ref().unwrap();
        assert_eq!(alert.title, "Failed to logout");
        assert_eq!(alert.body, "Session store down");
    });
}

#[tokio::test]
async fn disconnect_clears_catalog_and_drafts() {
    let (controller, _backend) = connected();
    controller.load_products().await.unwrap();
    controller.toggle_bundle_product(ProductId(1));

    controller.disconnect().await.unwrap();

    controller.read(|state| {
        assert!(!state.session.connected);
        assert!(state.session.shop.is_empty());
        assert!(state.products.is_empty());
        assert!(state.bundle.is_empty());
    });
}

// ---------------------------------------------------------------------------
// 商品・ローンチ素材
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_products_requires_connection() {
    let (controller, backend) = setup();

    let result = controller.load_products().await;

    assert!(matches!(result, Err(ActionError::NotConnected)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn scope_approval_alert_lists_instructions_in_order() {
    let (controller, backend) = connected();
    backend.fail("products", Failure::ScopeApproval);

    let _ = controller.load_products().await;

    let alert = controller.read(|state| state.alert.clone()).unwrap();
    assert_eq!(alert.level, AlertLevel::Warning);
    assert_eq!(alert.body, "Product access needs approval.");
    assert_eq!(
        alert.steps,
        vec![
            "Open the Partner Dashboard",
            "Request protected data access",
            "Reconnect the store"
        ]
    );
}

#[tokio::test]
async fn generate_failure_keeps_previous_suggestion() {
    let (controller, backend) = connected();
    controller.select_optimize_product(Some(ProductId(1)));
    controller.generate().await.unwrap();

    backend.fail("generate", Failure::Status(502, "Model overloaded"));
    let result = controller.generate().await;

    assert!(result.is_err());
    let suggestion = controller.read(|state| state.optimize.suggestion.clone());
    assert_eq!(suggestion.map(|s| s.title), Some("Launch 1".to_string()));
}

#[tokio::test]
async fn apply_consumes_suggestion() {
    let (controller, backend) = connected();
    controller.select_optimize_product(Some(ProductId(2)));
    controller.generate().await.unwrap();

    controller.apply().await.unwrap();

    assert_eq!(backend.count("apply 2 Launch 2"), 1);
    controller.read(|state| {
        assert!(state.optimize.suggestion.is_none());
        assert_eq!(state.optimize.selected, Some(ProductId(2)));
        assert_eq!(state.alert.as_ref().map(|a| a.title.as_str()), Some("Applied successfully!"));
    });

    let again = controller.apply().await;
    assert!(matches!(again, Err(ActionError::NothingToApply)));
}

#[tokio::test]
async fn changing_selection_drops_suggestion_for_previous_product() {
    let (controller, backend) = connected();
    controller.select_optimize_product(Some(ProductId(1)));
    controller.generate().await.unwrap();

    controller.select_optimize_product(Some(ProductId(2)));
    controller.read(|state| {
        assert_eq!(state.optimize.selected, Some(ProductId(2)));
        assert!(state.optimize.suggestion.is_none());
    });

    let result = controller.apply().await;
    assert!(matches!(result, Err(ActionError::NothingToApply)));
    assert_eq!(backend.count("apply"), 0);

    // 同じ商品を選び直しても提案は残る
    controller.generate().await.unwrap();
    controller.select_optimize_product(Some(ProductId(2)));
    controller.apply().await.unwrap();
    assert_eq!(backend.count("apply 2 Launch 2"), 1);
}

#[tokio::test]
async fn second_generate_is_rejected_while_first_is_running() {
    let (controller, backend) = connected();
    controller.select_optimize_product(Some(ProductId(1)));
    let gate = backend.gate("generate");

    let (first, second) = tokio::join!(controller.generate(), async {
        assert!(controller.read(|state| state.is_busy(Activity::Generating)));
        let second = controller.generate().await;
        gate.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(ActionError::Busy(Activity::Generating))));
    assert_eq!(backend.count("generate"), 1);
    assert!(!controller.read(|state| state.is_busy(Activity::Generating)));
}

// ---------------------------------------------------------------------------
// バンドル（グリッド）
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_fills_slots_in_order_and_ignores_third_pick() {
    let (controller, _backend) = connected();
    controller.select_optimize_product(Some(ProductId(3)));

    assert_eq!(controller.toggle_bundle_product(ProductId(1)), SelectionChange::SelectedA);
    assert!(controller.read(|state| state.optimize.selected.is_none()));
    assert_eq!(controller.toggle_bundle_product(ProductId(2)), SelectionChange::SelectedB);
    assert_eq!(controller.toggle_bundle_product(ProductId(3)), SelectionChange::Ignored);
    assert_eq!(controller.toggle_bundle_product(ProductId(1)), SelectionChange::DeselectedA);
    assert_eq!(controller.toggle_bundle_product(ProductId(3)), SelectionChange::SelectedA);

    let pair = controller.read(|state| state.bundle.selected_pair());
    assert_eq!(pair, Some((ProductId(3), ProductId(2))));
}

#[tokio::test]
async fn grid_bundle_generate_and_create_resets_draft() {
    let (controller, backend) = connected();
    controller.load_products().await.unwrap();
    controller.toggle_bundle_product(ProductId(1));
    controller.toggle_bundle_product(ProductId(2));

    controller.generate_bundle().await.unwrap();
    let estimate = controller.read(|state| state.bundle.estimated_price());
    assert_eq!(estimate, Some(25.5));

    controller.create_bundle().await.unwrap();

    assert_eq!(backend.count("create_bundle 1 2 Morning Duo"), 1);
    controller.read(|state| {
        assert!(state.bundle.is_empty());
        assert_eq!(state.alert.as_ref().map(|a| a.level), Some(AlertLevel::Success));
        // グリッドからの作成ではチャットに何も追加しない
        assert!(state.chat.is_empty());
    });
}

#[tokio::test]
async fn generate_bundle_requires_two_products() {
    let (controller, backend) = connected();
    controller.toggle_bundle_product(ProductId(1));

    let result = controller.generate_bundle().await;

    assert!(matches!(result, Err(ActionError::BundleIncomplete)));
    assert_eq!(backend.count("generate_bundle"), 0);
}

// ---------------------------------------------------------------------------
// チャット
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_bundle_flow_end_to_end() {
    let (controller, backend) = connected();
    backend.set_intent("Pick the first product for your bundle.", ShowSection::Bundle);

    controller.handle_agent_prompt("I want to create a bundle").await.unwrap();

    assert_eq!(
        controller.read(|state| state.step.clone()),
        ConversationStep::AwaitingBundleProductA
    );
    assert_eq!(backend.count("products"), 1);
    let grid = last_message(&controller);
    assert_eq!(grid.content, "Pick the first product for your bundle.");
    assert_eq!(selection_ids(&grid.payload), vec![1, 2, 3]);

    let first = product(1, "Sunrise Mug", "20.00");
    controller.handle_product_click(first.clone()).await.unwrap();
    assert_eq!(
        controller.read(|state| state.step.clone()),
        ConversationStep::AwaitingBundleProductB {
            product_a: ProductId(1)
        }
    );
    let follow_up = last_message(&controller);
    assert_eq!(selection_ids(&follow_up.payload), vec![2, 3]);

    // 1つ目と同じ商品は案内だけ
    controller.handle_product_click(first).await.unwrap();
    assert!(last_message(&controller).content.contains("already your first product"));
    assert_eq!(backend.count("generate_bundle"), 0);

    controller
        .handle_product_click(product(2, "Dark Roast Beans", "10.00"))
        .await
        .unwrap();
    assert_eq!(controller.read(|state| state.step.clone()), ConversationStep::Complete);
    assert_eq!(backend.count("generate_bundle 1 2"), 1);
    let preview = last_message(&controller);
    match &preview.payload {
        ChatPayload::BundlePreview(preview) => {
            assert_eq!(preview.bundle.title, "Morning Duo");
            assert_eq!(preview.product_b.id, ProductId(2));
        }
        other => panic!("expected bundle preview, got {other:?}"),
    }

    controller.create_bundle().await.unwrap();
    controller.read(|state| {
        assert_eq!(state.step, ConversationStep::Initial);
        assert!(state.bundle.is_empty());
        let last = state.chat.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.content.starts_with("🎉"));
    });

    // 完了後のクリックは無視される
    let before = controller.read(|state| state.chat.len());
    controller
        .handle_product_click(product(3, "Pour Over Kit", "35.00"))
        .await
        .unwrap();
    assert_eq!(controller.read(|state| state.chat.len()), before);
}

#[tokio::test]
async fn chat_optimize_flow_generates_for_clicked_product() {
    let (controller, backend) = connected();
    controller.load_products().await.unwrap();
    controller.toggle_bundle_product(ProductId(3));
    backend.set_intent("Which product are we launching?", ShowSection::Optimize);

    controller.handle_agent_prompt("optimize a launch").await.unwrap();
    assert!(controller.read(|state| state.bundle.is_empty()));
    // 読み込み済みの一覧を再利用する
    assert_eq!(backend.count("products"), 1);

    controller
        .handle_product_click(product(2, "Dark Roast Beans", "10.00"))
        .await
        .unwrap();

    controller.read(|state| {
        assert_eq!(state.step, ConversationStep::Complete);
        assert_eq!(state.optimize.selected, Some(ProductId(2)));
        assert_eq!(
            state.optimize.suggestion.as_ref().map(|s| s.title.as_str()),
            Some("Launch 2")
        );
        // プレビューと適用ボタンのあるタブへ移る
        assert_eq!(state.active_tab, ActiveTab::Optimize);
        assert!(state.chat.last().unwrap().content.contains("Launch Assets tab"));
    });

    controller.apply().await.unwrap();
    assert_eq!(backend.count("apply 2 Launch 2"), 1);
}

#[tokio::test]
async fn chat_bundle_failure_lets_user_pick_second_product_again() {
    let (controller, backend) = connected();
    backend.set_intent("Pick the first product for your bundle.", ShowSection::Bundle);
    controller.handle_agent_prompt("bundle please").await.unwrap();
    controller
        .handle_product_click(product(1, "Sunrise Mug", "20.00"))
        .await
        .unwrap();

    backend.fail("generate_bundle", Failure::Status(502, "Model overloaded"));
    let result = controller
        .handle_product_click(product(2, "Dark Roast Beans", "10.00"))
        .await;

    assert!(result.is_err());
    controller.read(|state| {
        assert_eq!(
            state.step,
            ConversationStep::AwaitingBundleProductB {
                product_a: ProductId(1)
            }
        );
        assert_eq!(state.bundle.product_a_id, Some(ProductId(1)));
        assert_eq!(state.bundle.product_b_id, None);
        assert!(state.chat.last().unwrap().content.starts_with("Failed to generate bundle"));
    });

    backend.recover("generate_bundle");
    controller
        .handle_product_click(product(3, "Pour Over Kit", "35.00"))
        .await
        .unwrap();
    assert_eq!(controller.read(|state| state.step.clone()), ConversationStep::Complete);
    assert_eq!(backend.count("generate_bundle 1 3"), 1);
}

#[tokio::test]
async fn click_outside_selection_step_is_ignored() {
    let (controller, backend) = connected();

    controller
        .handle_product_click(product(1, "Sunrise Mug", "20.00"))
        .await
        .unwrap();

    assert!(controller.read(|state| state.chat.is_empty()));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn other_intent_replies_without_products() {
    let (controller, backend) = connected();
    backend.set_intent("I can help with bundles and launches.", ShowSection::Other("faq".to_string()));

    controller.handle_agent_prompt("hello").await.unwrap();

    controller.read(|state| {
        assert_eq!(state.step, ConversationStep::Initial);
        assert_eq!(state.chat.len(), 2);
        assert_eq!(state.chat[0].role, ChatRole::User);
        assert_eq!(state.chat[1].content, "I can help with bundles and launches.");
    });
    assert_eq!(backend.count("products"), 0);
}

#[tokio::test]
async fn bundle_intent_without_connection_asks_to_connect() {
    let (controller, backend) = setup();
    backend.set_intent("Pick a product.", ShowSection::Bundle);

    let result = controller.handle_agent_prompt("bundle please").await;

    assert!(matches!(result, Err(ActionError::NotConnected)));
    let reply = last_message(&controller);
    assert!(reply.content.starts_with("Please connect your Shopify store first"));
    assert_eq!(controller.read(|state| state.step.clone()), ConversationStep::Initial);
}

#[tokio::test]
async fn intent_failure_is_reported_in_chat() {
    let (controller, backend) = connected();
    backend.fail("agent_intent", Failure::Status(500, "LLM unavailable"));

    let result = controller.handle_agent_prompt("bundle please").await;

    assert!(result.is_err());
    let reply = last_message(&controller);
    assert_eq!(reply.content, "Sorry, I couldn't process that request: LLM unavailable");

    backend.recover("agent_intent");
    controller.handle_agent_prompt("hello").await.unwrap();
    assert_eq!(controller.read(|state| state.chat.len()), 4);
}

#[tokio::test]
async fn blank_prompt_is_ignored() {
    let (controller, backend) = connected();

    controller.handle_agent_prompt("   ").await.unwrap();

    assert!(controller.read(|state| state.chat.is_empty()));
    assert!(backend.calls().is_empty());
}

// ---------------------------------------------------------------------------
// 診断
// ---------------------------------------------------------------------------

#[tokio::test]
async fn diagnose_reports_model_and_missing_usage() {
    let (controller, _backend) = setup();

    controller.diagnose().await.unwrap();

    let alert = controller.read(|state| state.alert.clone()).unwrap();
    assert_eq!(alert.title, "✅ AI Backend Test Successful!");
    assert_eq!(alert.body, "Response: pong\nModel: test-model\nTokens used: N/A");

    controller.dismiss_alert();
    assert!(controller.read(|state| state.alert.is_none()));
}
