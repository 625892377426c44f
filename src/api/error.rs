//! バックエンド呼び出しのエラー型
//!
//! FastAPI系のバックエンドはエラー詳細を `detail` に包んで返すため、
//! そこから人間が読める文字列を取り出す処理もここにまとめる。

use serde_json::Value;

/// スコープ承認エラーを示す `detail.error` の値
pub const SCOPE_APPROVAL_REQUIRED: &str = "scope_approval_required";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    ScopeApprovalRequired {
        message: String,
        instructions: Vec<String>,
    },

    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("Failed to parse {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid backend URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTPステータス（ステータス起因のエラーのみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ScopeApprovalRequired { .. } => Some(403),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// 非成功レスポンスから適切なエラーを組み立てる
    pub fn from_response_body(status: u16, status_text: &str, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();

        if status == 403 {
            if let Some((message, instructions)) =
                parsed.as_ref().and_then(scope_approval_payload)
            {
                return ApiError::ScopeApprovalRequired {
                    message,
                    instructions,
                };
            }
        }

        ApiError::Status {
            status,
            detail: extract_error_detail(parsed.as_ref(), status_text),
        }
    }
}

/// `{ detail: { error: "scope_approval_required", message, instructions } }` を取り出す
fn scope_approval_payload(body: &Value) -> Option<(String, Vec<String>)> {
    let detail = body.get("detail").unwrap_or(body);
    if detail.get("error").and_then(Value::as_str) != Some(SCOPE_APPROVAL_REQUIRED) {
        return None;
    }

    let message = detail
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let instructions = detail
        .get("instructions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Some((message, instructions))
}

/// エラーボディから最も具体的な説明文を選ぶ
///
/// `detail`（文字列）→ `detail.message` → `detail.detail` → `message` → `error`
/// の順に探し、どれも無ければトランスポートのステータス文字列を返す。
pub fn extract_error_detail(body: Option<&Value>, status_text: &str) -> String {
    let non_empty = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };

    let Some(body) = body else {
        return status_text.to_string();
    };

    if let Some(text) = non_empty(Some(body)) {
        return text;
    }

    let detail = body.get("detail");
    non_empty(detail)
        .or_else(|| non_empty(detail.and_then(|d| d.get("message"))))
        .or_else(|| non_empty(detail.and_then(|d| d.get("detail"))))
        .or_else(|| non_empty(body.get("message")))
        .or_else(|| non_empty(body.get("error")))
        .unwrap_or_else(|| status_text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_approval_payload_is_recognized() {
        let body = json!({
            "detail": {
                "error": "scope_approval_required",
                "message": "The read_products scope requires merchant approval.",
                "instructions": ["1. Go to admin", "2. Uninstall", "3. Reconnect"]
            }
        })
        .to_string();

        match ApiError::from_response_body(403, "Forbidden", &body) {
            ApiError::ScopeApprovalRequired {
                message,
                instructions,
            } => {
                assert_eq!(message, "The read_products scope requires merchant approval.");
                assert_eq!(
                    instructions,
                    vec!["1. Go to admin", "2. Uninstall", "3. Reconnect"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_scope_payload_on_other_status_is_plain_error() {
        let body = json!({"detail": {"error": "scope_approval_required", "message": "nope"}})
            .to_string();
        let error = ApiError::from_response_body(400, "Bad Request", &body);
        assert!(matches!(error, ApiError::Status { status: 400, .. }));
        assert_eq!(error.to_string(), "nope");
    }

    #[test]
    fn test_other_403_falls_back_to_detail() {
        let body = json!({"detail": "Not allowed"}).to_string();
        let error = ApiError::from_response_body(403, "Forbidden", &body);
        assert_eq!(error.to_string(), "Not allowed");
        assert_eq!(error.status(), Some(403));
    }

    #[test]
    fn test_detail_fallback_chain() {
        let text = "Internal Server Error";
        assert_eq!(
            extract_error_detail(Some(&json!({"detail": "plain"})), text),
            "plain"
        );
        assert_eq!(
            extract_error_detail(Some(&json!({"detail": {"message": "nested"}})), text),
            "nested"
        );
        assert_eq!(
            extract_error_detail(Some(&json!({"detail": {"detail": "deeper"}})), text),
            "deeper"
        );
        assert_eq!(
            extract_error_detail(Some(&json!({"message": "top level"})), text),
            "top level"
        );
        assert_eq!(extract_error_detail(Some(&json!({"detail": {}})), text), text);
        assert_eq!(extract_error_detail(None, text), text);
    }

    #[test]
    fn test_non_json_body_uses_status_text() {
        let error = ApiError::from_response_body(502, "Bad Gateway", "<html>oops</html>");
        assert_eq!(error.to_string(), "Bad Gateway");
    }
}
