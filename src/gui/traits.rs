//! GUI層のトレイト定義
//!
//! コントローラはHTTPやウィンドウ操作に直接依存せず、ここで定義した
//! 抽象インタフェースを通して外部とやりとりする。

use async_trait::async_trait;

use crate::api::{
    ApiError, BackendClient, BackendDiagnostic, Bundle, GenerateBundleResponse, GenerateResponse,
    IntentResponse, Product, ProductId, Suggestion,
};

/// ShopGenieバックエンドの抽象インタフェース
#[async_trait]
pub trait ShopBackend: Send + Sync {
    /// 認可ページのURLを取得
    async fn install_url(&self, shop: &str) -> Result<String, ApiError>;

    /// ストアの接続状態を取得
    async fn connection_status(&self, shop: &str) -> Result<bool, ApiError>;

    /// バックエンド側のセッションを破棄
    async fn logout(&self, shop: &str) -> Result<(), ApiError>;

    /// 商品一覧を取得
    async fn products(&self, shop: &str, limit: u32) -> Result<Vec<Product>, ApiError>;

    /// ローンチ素材を生成
    async fn generate(&self, shop: &str, product_id: ProductId)
        -> Result<GenerateResponse, ApiError>;

    /// 生成済み素材をストアへ反映
    async fn apply(
        &self,
        shop: &str,
        product_id: ProductId,
        suggestion: &Suggestion,
    ) -> Result<(), ApiError>;

    /// バンドルを生成
    async fn generate_bundle(
        &self,
        shop: &str,
        product_a_id: ProductId,
        product_b_id: ProductId,
    ) -> Result<GenerateBundleResponse, ApiError>;

    /// バンドル商品をストアに作成
    async fn create_bundle(
        &self,
        shop: &str,
        product_a: &Product,
        product_b: &Product,
        bundle: &Bundle,
    ) -> Result<(), ApiError>;

    /// 自然文の意図分類
    async fn agent_intent(&self, prompt: &str) -> Result<IntentResponse, ApiError>;

    /// AIバックエンドの疎通確認
    async fn diagnose(&self) -> Result<BackendDiagnostic, ApiError>;
}

#[async_trait]
impl ShopBackend for BackendClient {
    async fn install_url(&self, shop: &str) -> Result<String, ApiError> {
        BackendClient::install_url(self, shop).await
    }

    async fn connection_status(&self, shop: &str) -> Result<bool, ApiError> {
        BackendClient::connection_status(self, shop).await
    }

    async fn logout(&self, shop: &str) -> Result<(), ApiError> {
        BackendClient::logout(self, shop).await
    }

    async fn products(&self, shop: &str, limit: u32) -> Result<Vec<Product>, ApiError> {
        BackendClient::products(self, shop, limit).await
    }

    async fn generate(
        &self,
        shop: &str,
        product_id: ProductId,
    ) -> Result<GenerateResponse, ApiError> {
        BackendClient::generate(self, shop, product_id).await
    }

    async fn apply(
        &self,
        shop: &str,
        product_id: ProductId,
        suggestion: &Suggestion,
    ) -> Result<(), ApiError> {
        BackendClient::apply(self, shop, product_id, suggestion).await
    }

    async fn generate_bundle(
        &self,
        shop: &str,
        product_a_id: ProductId,
        product_b_id: ProductId,
    ) -> Result<GenerateBundleResponse, ApiError> {
        BackendClient::generate_bundle(self, shop, product_a_id, product_b_id).await
    }

    async fn create_bundle(
        &self,
        shop: &str,
        product_a: &Product,
        product_b: &Product,
        bundle: &Bundle,
    ) -> Result<(), ApiError> {
        BackendClient::create_bundle(self, shop, product_a, product_b, bundle)
            .await
            .map(|_| ())
    }

    async fn agent_intent(&self, prompt: &str) -> Result<IntentResponse, ApiError> {
        BackendClient::agent_intent(self, prompt).await
    }

    async fn diagnose(&self) -> Result<BackendDiagnostic, ApiError> {
        BackendClient::diagnose(self).await
    }
}

/// 認可ページへの遷移を担うインタフェース
///
/// 認可ページを開き、ストアから戻ってきたコールバックURLを返す。
/// ユーザーが途中で閉じた場合は `Ok(None)`。
#[async_trait]
pub trait AuthNavigator: Send + Sync {
    async fn authorize(&self, install_url: &str) -> anyhow::Result<Option<String>>;
}
