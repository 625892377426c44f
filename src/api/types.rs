//! バックエンドAPIのリクエスト/レスポンス型
//!
//! 商品レコードはShopify Admin APIの形をそのまま中継したものなので、
//! 画面で使うフィールド以外も `extra` に保持して `create-bundle` へ返送する。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shopify商品ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// 商品画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 商品バリアント（価格は文字列の10進数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub price: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductVariant {
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse::<f64>().ok()
    }
}

/// 商品レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// 一覧・プレビューで使う代表画像
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|image| image.src.as_str())
    }

    /// 先頭バリアントの価格
    pub fn primary_price(&self) -> Option<f64> {
        self.variants.first().and_then(ProductVariant::price_value)
    }

    pub fn price_label(&self) -> Option<String> {
        self.variants
            .first()
            .filter(|variant| !variant.price.is_empty())
            .map(|variant| format!("${}", variant.price))
    }
}

/// タグ。LLMの出力次第でカンマ区切り文字列か配列のどちらかで届く
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    Joined(String),
    List(Vec<String>),
}

impl Default for Tags {
    fn default() -> Self {
        Tags::Joined(String::new())
    }
}

impl Tags {
    /// 表示用に個々のタグへ分解
    pub fn items(&self) -> Vec<String> {
        match self {
            Tags::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            Tags::List(list) => list
                .iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }
}

impl std::fmt::Display for Tags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.items().join(", "))
    }
}

/// 割合フィールド
///
/// モデルの出力がそのまま中継されるため、数値・数値文字列（`"15"`, `"15%"`）・nullを受け付ける。
/// nullや数値として読めない文字列は0として扱う。
fn deserialize_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Percent {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Percent>::deserialize(deserializer)? {
        Some(Percent::Number(value)) => value,
        Some(Percent::Text(text)) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0),
        None => 0.0,
    })
}

/// 単一商品向けのローンチ素材
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description_html: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub discount_code: String,
    #[serde(default, deserialize_with = "deserialize_percent")]
    pub discount_percent: f64,
    #[serde(default)]
    pub banner_copy: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 2商品から生成されたバンドル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub title: String,
    pub description_html: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default, deserialize_with = "deserialize_percent")]
    pub bundle_price_percent_off: f64,
    #[serde(default)]
    pub bundle_notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bundle {
    /// 先頭バリアント価格の合計から割引後のバンドル価格を見積もる（セント単位で丸め）
    pub fn estimated_price(&self, product_a: &Product, product_b: &Product) -> Option<f64> {
        let total = product_a.primary_price()? + product_b.primary_price()?;
        let discounted = total * (1.0 - self.bundle_price_percent_off / 100.0);
        Some((discounted * 100.0).round() / 100.0)
    }
}

/// インテント分類結果の表示セクション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ShowSection {
    Bundle,
    Optimize,
    Other(String),
    None,
}

impl From<Option<String>> for ShowSection {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("bundle") => ShowSection::Bundle,
            Some("optimize") => ShowSection::Optimize,
            Some(other) => ShowSection::Other(other.to_string()),
            None => ShowSection::None,
        }
    }
}

impl From<ShowSection> for Option<String> {
    fn from(value: ShowSection) -> Self {
        match value {
            ShowSection::Bundle => Some("bundle".to_string()),
            ShowSection::Optimize => Some("optimize".to_string()),
            ShowSection::Other(other) => Some(other),
            ShowSection::None => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallResponse {
    pub install_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub product: Option<Product>,
    pub suggestion: Suggestion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBundleResponse {
    pub product_a: Product,
    pub product_b: Product,
    pub bundle: Bundle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBundleResponse {
    #[serde(default)]
    pub created_product: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntentResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_show_section")]
    pub show_section: ShowSection,
}

fn default_show_section() -> ShowSection {
    ShowSection::None
}

/// `/api/test-claude` のトークン使用量
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticUsage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

/// `/api/test-claude` の診断結果
#[derive(Debug, Clone, Deserialize)]
pub struct BackendDiagnostic {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<DiagnosticUsage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub shop: &'a str,
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApplyRequest<'a> {
    pub shop: &'a str,
    pub product_id: ProductId,
    pub suggestion: &'a Suggestion,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateBundleRequest<'a> {
    pub shop: &'a str,
    pub product_a_id: ProductId,
    pub product_b_id: ProductId,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBundleRequest<'a> {
    pub shop: &'a str,
    pub product_a: &'a Product,
    pub product_b: &'a Product,
    pub bundle: &'a Bundle,
}

#[derive(Debug, Serialize)]
pub(crate) struct IntentRequest<'a> {
    pub prompt: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json(id: i64, price: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "handle": format!("product-{id}"),
            "images": [{"id": 1, "src": format!("https://cdn.example/{id}.png")}],
            "variants": [{"id": 11, "title": "Default Title", "price": price}]
        })
    }

    #[test]
    fn test_product_keeps_unknown_fields() {
        let product: Product = serde_json::from_value(product_json(7, "12.50")).unwrap();
        assert_eq!(product.id, ProductId(7));
        assert_eq!(product.primary_image(), Some("https://cdn.example/7.png"));
        assert_eq!(product.extra.get("handle"), Some(&json!("product-7")));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["handle"], json!("product-7"));
        assert_eq!(back["variants"][0]["id"], json!(11));
    }

    #[test]
    fn test_product_without_images_or_variants() {
        let product: Product = serde_json::from_value(json!({"id": 3, "title": "Bare"})).unwrap();
        assert!(product.images.is_empty());
        assert_eq!(product.primary_price(), None);
        assert_eq!(product.price_label(), None);
    }

    #[test]
    fn test_percent_fields_accept_strings_and_null() {
        let suggestion: Suggestion = serde_json::from_value(json!({
            "title": "Launch",
            "description_html": "<p>New</p>",
            "discount_percent": "15"
        }))
        .unwrap();
        assert_eq!(suggestion.discount_percent, 15.0);

        let suggestion: Suggestion = serde_json::from_value(json!({
            "title": "Launch",
            "description_html": "<p>New</p>",
            "discount_percent": null
        }))
        .unwrap();
        assert_eq!(suggestion.discount_percent, 0.0);

        let bundle: Bundle = serde_json::from_value(json!({
            "title": "Duo",
            "description_html": "<p>Pair</p>",
            "bundle_price_percent_off": "10%"
        }))
        .unwrap();
        assert_eq!(bundle.bundle_price_percent_off, 10.0);

        let bundle: Bundle = serde_json::from_value(json!({
            "title": "Duo",
            "description_html": "<p>Pair</p>",
            "bundle_price_percent_off": 12
        }))
        .unwrap();
        assert_eq!(bundle.bundle_price_percent_off, 12.0);

        let bundle: Bundle = serde_json::from_value(json!({
            "title": "Duo",
            "description_html": "<p>Pair</p>"
        }))
        .unwrap();
        assert_eq!(bundle.bundle_price_percent_off, 0.0);
    }

    #[test]
    fn test_tags_accept_string_and_list() {
        let joined: Tags = serde_json::from_value(json!("summer, launch ,, gift")).unwrap();
        assert_eq!(joined.items(), vec!["summer", "launch", "gift"]);

        let list: Tags = serde_json::from_value(json!(["summer", "gift"])).unwrap();
        assert_eq!(list.to_string(), "summer, gift");
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["summer", "gift"]));
    }

    #[test]
    fn test_show_section_mapping() {
        let intent: IntentResponse =
            serde_json::from_value(json!({"message": "hi", "show_section": "bundle"})).unwrap();
        assert_eq!(intent.show_section, ShowSection::Bundle);

        let intent: IntentResponse =
            serde_json::from_value(json!({"message": "hi", "show_section": null})).unwrap();
        assert_eq!(intent.show_section, ShowSection::None);

        let intent: IntentResponse = serde_json::from_value(json!({"message": "hi"})).unwrap();
        assert_eq!(intent.show_section, ShowSection::None);

        let intent: IntentResponse =
            serde_json::from_value(json!({"message": "hi", "show_section": "products"})).unwrap();
        assert_eq!(intent.show_section, ShowSection::Other("products".to_string()));
    }

    #[test]
    fn test_bundle_estimated_price() {
        let a: Product = serde_json::from_value(product_json(1, "20.00")).unwrap();
        let b: Product = serde_json::from_value(product_json(2, "10.00")).unwrap();
        let bundle: Bundle = serde_json::from_value(json!({
            "title": "Duo",
            "description_html": "<p>Duo</p>",
            "tags": "duo",
            "bundle_price_percent_off": 15,
            "bundle_notes": "notes"
        }))
        .unwrap();

        assert_eq!(bundle.estimated_price(&a, &b), Some(25.5));

        let free: Product = serde_json::from_value(json!({"id": 9, "title": "No price"})).unwrap();
        assert_eq!(bundle.estimated_price(&a, &free), None);
    }
}
