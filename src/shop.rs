//! ショップドメインの正規化とOAuthコールバックURLの処理

use reqwest::Url;

/// Shopifyストアのドメインサフィックス
pub const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";

/// 入力から取り除く一般的なTLD（複合TLDを先に判定する）
const KNOWN_TLDS: &[&str] = &[
    ".co.uk", ".com.au", ".com", ".net", ".org", ".io", ".co", ".store", ".shop", ".biz",
    ".info", ".us", ".uk", ".ca", ".au", ".de",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    #[error("Shop domain is empty")]
    Empty,
    #[error("Invalid shop domain \"{input}\": {reason}")]
    Invalid { input: String, reason: String },
}

/// ストア名や任意のドメイン入力を `<name>.myshopify.com` 形式へ正規化する
///
/// - ドットを含まない入力はそのままサフィックスを付与
/// - 既知のTLDで終わる入力はTLDを除いてからサフィックスを付与
/// - 既に `.myshopify.com` の場合はそのまま
/// - それ以外のドット入りホストはカスタムドメインとして変更しない
pub fn normalize_shop_domain(input: &str) -> Result<String, ShopDomainError> {
    let mut host = input.trim().to_ascii_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = host.strip_prefix(scheme) {
            host = rest.to_string();
        }
    }
    if let Some(end) = host.find(['/', '?', '#']) {
        host.truncate(end);
    }

    if host.is_empty() {
        return Err(ShopDomainError::Empty);
    }

    if let Some(name) = host.strip_suffix(MYSHOPIFY_SUFFIX) {
        validate_store_name(input, name)?;
        return Ok(host);
    }

    if !host.contains('.') {
        validate_store_name(input, &host)?;
        return Ok(format!("{host}{MYSHOPIFY_SUFFIX}"));
    }

    if let Some(name) = KNOWN_TLDS.iter().find_map(|tld| host.strip_suffix(tld)) {
        if !name.contains('.') {
            validate_store_name(input, name)?;
            return Ok(format!("{name}{MYSHOPIFY_SUFFIX}"));
        }
    }

    if host
        .split('.')
        .any(|label| label.is_empty() || !is_valid_label(label))
    {
        return Err(ShopDomainError::Invalid {
            input: input.to_string(),
            reason: "host contains an empty or invalid label".to_string(),
        });
    }

    Ok(host)
}

fn is_valid_label(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn validate_store_name(input: &str, name: &str) -> Result<(), ShopDomainError> {
    if name.is_empty() {
        return Err(ShopDomainError::Invalid {
            input: input.to_string(),
            reason: "store name is empty".to_string(),
        });
    }
    if !is_valid_label(name) {
        return Err(ShopDomainError::Invalid {
            input: input.to_string(),
            reason: "store name may only contain letters, digits and '-'".to_string(),
        });
    }
    Ok(())
}

/// OAuth完了時のリダイレクトに含まれる情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCallback {
    pub shop: String,
}

impl OAuthCallback {
    /// `shop` と `connected=true` の両方を含むURLのみコールバックとして扱う
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let mut shop = None;
        let mut connected = false;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "shop" if !value.is_empty() => shop = Some(value.into_owned()),
                "connected" => connected = value == "true",
                _ => {}
            }
        }
        match (shop, connected) {
            (Some(shop), true) => Some(Self { shop }),
            _ => None,
        }
    }
}

/// コールバックを読み取った後の表示用URL（クエリとフラグメントを除去）
pub fn strip_query(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}
