//! コントローラとDioxusコンポーネントの接続フック
//!
//! コントローラのリビジョン通知を購読し、状態のスナップショットを
//! `Signal<AppState>` に反映する。アクションはハンドル経由で非同期に起動する。

use dioxus::prelude::*;

use crate::api::{Product, ProductId};
use crate::gui::controller::ShopGenieController;
use crate::gui::models::ActiveTab;
use crate::gui::state::AppState;

/// コンポーネントから使うハンドル
#[derive(Clone)]
pub struct ShopGenieHandle {
    pub controller: ShopGenieController,
    pub state: Signal<AppState>,
}

impl PartialEq for ShopGenieHandle {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl ShopGenieHandle {
    fn run<F, Fut>(&self, action: F)
    where
        F: FnOnce(ShopGenieController) -> Fut + 'static,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        let controller = self.controller.clone();
        spawn(action(controller));
    }

    pub fn connect(&self, shop_input: String) {
        self.run(move |c| async move {
            let _ = c.connect(&shop_input).await;
        });
    }

    pub fn disconnect(&self) {
        self.run(|c| async move {
            let _ = c.disconnect().await;
        });
    }

    pub fn load_products(&self) {
        self.run(|c| async move {
            let _ = c.load_products().await;
        });
    }

    pub fn select_optimize_product(&self, product_id: Option<ProductId>) {
        self.controller.select_optimize_product(product_id);
    }

    pub fn generate(&self) {
        self.run(|c| async move {
            let _ = c.generate().await;
        });
    }

    pub fn apply(&self) {
        self.run(|c| async move {
            let _ = c.apply().await;
        });
    }

    pub fn toggle_bundle_product(&self, product_id: ProductId) {
        self.controller.toggle_bundle_product(product_id);
    }

    pub fn generate_bundle(&self) {
        self.run(|c| async move {
            let _ = c.generate_bundle().await;
        });
    }

    pub fn create_bundle(&self) {
        self.run(|c| async move {
            let _ = c.create_bundle().await;
        });
    }

    pub fn send_prompt(&self, text: String) {
        self.run(move |c| async move {
            let _ = c.handle_agent_prompt(&text).await;
        });
    }

    pub fn click_product(&self, product: Product) {
        self.run(move |c| async move {
            let _ = c.handle_product_click(product).await;
        });
    }

    pub fn diagnose(&self) {
        self.run(|c| async move {
            let _ = c.diagnose().await;
        });
    }

    pub fn dismiss_alert(&self) {
        self.controller.dismiss_alert();
    }

    pub fn set_active_tab(&self, tab: ActiveTab) {
        self.controller.set_active_tab(tab);
    }
}

/// ルートで一度だけ呼び、ハンドルをコンテキストに提供する
pub fn use_shop_genie_provider() -> ShopGenieHandle {
    let controller = use_context::<ShopGenieController>();

    let mut state = use_signal({
        let controller = controller.clone();
        move || controller.snapshot()
    });

    // リビジョン通知 → Signal
    use_future({
        let controller = controller.clone();
        move || {
            let controller = controller.clone();
            async move {
                let mut revisions = controller.subscribe();
                while revisions.changed().await.is_ok() {
                    state.set(controller.snapshot());
                }
                tracing::debug!("🔌 State revision channel closed");
            }
        }
    });

    // ショップが変わるたびに接続状態を確認
    let shop = use_memo(move || state.read().session.shop.clone());
    use_effect({
        let controller = controller.clone();
        move || {
            let shop = shop();
            if shop.is_empty() {
                return;
            }
            let controller = controller.clone();
            spawn(async move {
                controller.check_connection().await;
            });
        }
    });

    use_context_provider(|| ShopGenieHandle { controller, state })
}

/// 子コンポーネントからハンドルを取得
pub fn use_shop_genie() -> ShopGenieHandle {
    use_context::<ShopGenieHandle>()
}
