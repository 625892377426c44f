//! ShopGenieバックエンドのHTTPクライアント
//!
//! すべてのエンドポイントは固定のベースURL配下にある。
//! 自動リトライは行わず、失敗はそのまま `ApiError` として呼び出し元へ返す。

use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    ApplyRequest, BackendDiagnostic, Bundle, ConnectionStatus, CreateBundleRequest,
    CreateBundleResponse, GenerateBundleRequest, GenerateBundleResponse, GenerateRequest,
    GenerateResponse, InstallResponse, IntentRequest, IntentResponse, Product, ProductId,
    ProductsResponse, Suggestion,
};
use crate::gui::utils::{log_api_request, log_api_response};

/// ベースURLの既定値（ローカル開発用バックエンド）
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// バックエンドAPIクライアント
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// ベースURLを検証してクライアントを作成
    ///
    /// `timeout` が `None` の場合はタイムアウトを設定しない。
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = Client::builder().user_agent(concat!("shopgenie/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn shop_query(&self, path: &str, shop: &str) -> String {
        format!("{}?shop={}", self.url(path), urlencoding::encode(shop))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log_api_request(method.as_str(), url);
        self.client.request(method, url)
    }

    /// リクエストを送信し、成功時のボディをデコードする
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let body = self.send(request, context).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { context, source })
    }

    /// リクエストを送信し、成功時のボディ文字列を返す
    async fn send(&self, request: RequestBuilder, context: &'static str) -> Result<String, ApiError> {
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        log_api_response(
            context,
            status.as_u16(),
            body.len(),
            started.elapsed().as_millis() as u64,
        );

        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ApiError::from_response_body(status.as_u16(), &status_text, &body));
        }

        Ok(body)
    }

    /// `GET /auth/install` — 認可ページのURLを取得
    pub async fn install_url(&self, shop: &str) -> Result<String, ApiError> {
        let url = self.shop_query("/auth/install", shop);
        let response: InstallResponse = self
            .send_json(self.request(Method::GET, &url), "install")
            .await?;
        Ok(response.install_url)
    }

    /// `GET /api/shops/me` — 接続状態
    pub async fn connection_status(&self, shop: &str) -> Result<bool, ApiError> {
        let url = self.shop_query("/api/shops/me", shop);
        let response: ConnectionStatus = self
            .send_json(self.request(Method::GET, &url), "connection status")
            .await?;
        Ok(response.connected)
    }

    /// `DELETE /api/shops/logout`
    pub async fn logout(&self, shop: &str) -> Result<(), ApiError> {
        let url = self.shop_query("/api/shops/logout", shop);
        self.send(self.request(Method::DELETE, &url), "logout").await?;
        Ok(())
    }

    /// `GET /api/products` — 最大 `limit` 件の商品
    pub async fn products(&self, shop: &str, limit: u32) -> Result<Vec<Product>, ApiError> {
        let url = format!("{}&limit={}", self.shop_query("/api/products", shop), limit);
        let response: ProductsResponse = self
            .send_json(self.request(Method::GET, &url), "products")
            .await?;
        Ok(response.products)
    }

    /// `POST /api/generate` — 商品1件のローンチ素材を生成
    pub async fn generate(
        &self,
        shop: &str,
        product_id: ProductId,
    ) -> Result<GenerateResponse, ApiError> {
        let url = self.url("/api/generate");
        let request = self
            .request(Method::POST, &url)
            .json(&GenerateRequest { shop, product_id });
        self.send_json(request, "generate").await
    }

    /// `POST /api/apply` — 生成済み素材をストアへ反映
    pub async fn apply(
        &self,
        shop: &str,
        product_id: ProductId,
        suggestion: &Suggestion,
    ) -> Result<(), ApiError> {
        let url = self.url("/api/apply");
        let request = self.request(Method::POST, &url).json(&ApplyRequest {
            shop,
            product_id,
            suggestion,
        });
        self.send(request, "apply").await?;
        Ok(())
    }

    /// `POST /api/generate-bundle`
    pub async fn generate_bundle(
        &self,
        shop: &str,
        product_a_id: ProductId,
        product_b_id: ProductId,
    ) -> Result<GenerateBundleResponse, ApiError> {
        let url = self.url("/api/generate-bundle");
        let request = self
            .request(Method::POST, &url)
            .json(&GenerateBundleRequest {
                shop,
                product_a_id,
                product_b_id,
            });
        self.send_json(request, "generate bundle").await
    }

    /// `POST /api/create-bundle`
    pub async fn create_bundle(
        &self,
        shop: &str,
        product_a: &Product,
        product_b: &Product,
        bundle: &Bundle,
    ) -> Result<CreateBundleResponse, ApiError> {
        let url = self.url("/api/create-bundle");
        let request = self
            .request(Method::POST, &url)
            .json(&CreateBundleRequest {
                shop,
                product_a,
                product_b,
                bundle,
            });
        let body = self.send(request, "create bundle").await?;
        // 作成結果の本文は表示に使わないため、解釈できなくても成功扱い
        Ok(serde_json::from_str(&body).unwrap_or(CreateBundleResponse {
            created_product: None,
        }))
    }

    /// `POST /api/agent-intent` — 自然文の意図分類
    pub async fn agent_intent(&self, prompt: &str) -> Result<IntentResponse, ApiError> {
        let url = self.url("/api/agent-intent");
        let request = self
            .request(Method::POST, &url)
            .json(&IntentRequest { prompt });
        self.send_json(request, "agent intent").await
    }

    /// `GET /api/test-claude` — AIバックエンドの疎通確認
    ///
    /// 非成功ステータス時の説明は `detail` → `error` → `HTTP <code>: <reason>` の順。
    pub async fn diagnose(&self) -> Result<BackendDiagnostic, ApiError> {
        let url = self.url("/api/test-claude");
        let started = Instant::now();
        let response = self.request(Method::GET, &url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        log_api_response(
            "diagnose",
            status.as_u16(),
            body.len(),
            started.elapsed().as_millis() as u64,
        );

        if !status.is_success() {
            let parsed: Option<serde_json::Value> = serde_json::from_str(&body).ok();
            let pick = |key: &str| {
                parsed
                    .as_ref()
                    .and_then(|value| value.get(key))
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            };
            let detail = pick("detail").or_else(|| pick("error")).unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            context: "diagnose",
            source,
        })
    }
}
