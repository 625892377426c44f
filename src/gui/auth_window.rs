//! ストア認可ウィンドウモジュール
//!
//! 別ウィンドウでShopifyの認可ページを表示し、
//! バックエンドがリダイレクトしてきたコールバックURLを捕捉する。

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::gui::traits::AuthNavigator;
use crate::shop::{strip_query, OAuthCallback};

/// 認可ウィンドウのエラー型
#[derive(Error, Debug)]
pub enum AuthWindowError {
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    #[error("Failed to create WebView: {0}")]
    WebViewCreation(String),

    #[error("Authorization timed out")]
    Timeout,

    #[error("Authorization cancelled by user")]
    Cancelled,
}

/// 認可の結果（コールバックURL）
pub type AuthResult = Result<String, AuthWindowError>;

/// 認可タイムアウト（秒）
pub const AUTH_TIMEOUT_SECS: u64 = 300;

/// タイムアウト確認の間隔（ミリ秒）
const POLL_INTERVAL_MS: u64 = 250;

/// コールバックURLの判定
///
/// `callback_base` が指定されていればその前方一致も必要。
pub fn is_callback_url(url: &str, callback_base: Option<&str>) -> bool {
    let base_matches = callback_base
        .map(|base| url.starts_with(base.trim_end_matches('/')))
        .unwrap_or(true);
    base_matches && OAuthCallback::parse(url).is_some()
}

/// デスクトップ用の認可ナビゲータ
#[derive(Debug, Clone)]
pub struct DesktopAuthNavigator {
    timeout: Duration,
    callback_base: Option<String>,
}

impl Default for DesktopAuthNavigator {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(AUTH_TIMEOUT_SECS),
            callback_base: None,
        }
    }
}

impl DesktopAuthNavigator {
    /// コールバックとして扱うURLの前方一致条件
    pub fn with_callback_base(mut self, callback_base: impl Into<String>) -> Self {
        self.callback_base = Some(callback_base.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl AuthNavigator for DesktopAuthNavigator {
    async fn authorize(&self, install_url: &str) -> anyhow::Result<Option<String>> {
        match open_auth_window(install_url.to_string(), self.callback_base.clone(), self.timeout)
            .await
        {
            Ok(url) => Ok(Some(url)),
            Err(AuthWindowError::Cancelled) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// 認可ウィンドウを開き、コールバックURLに到達するまで待機する
pub async fn open_auth_window(
    install_url: String,
    callback_base: Option<String>,
    timeout: Duration,
) -> AuthResult {
    tracing::info!(url = %strip_query(&install_url), "🔐 Opening store authorization window...");

    let (tx, rx) = oneshot::channel::<AuthResult>();

    std::thread::spawn(move || {
        let result = run_auth_window_sync(&install_url, callback_base, timeout);
        let _ = tx.send(result);
    });

    match rx.await {
        Ok(result) => result,
        Err(_) => Err(AuthWindowError::Cancelled),
    }
}

fn build_event_loop() -> dioxus::desktop::tao::event_loop::EventLoop<()> {
    use dioxus::desktop::tao::event_loop::EventLoopBuilder;

    // 別スレッドで実行するためany_threadを使用
    let mut builder = EventLoopBuilder::new();
    #[cfg(target_os = "windows")]
    {
        use dioxus::desktop::tao::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }
    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    {
        use dioxus::desktop::tao::platform::unix::EventLoopBuilderExtUnix;
        builder.with_any_thread(true);
    }
    builder.build()
}

/// 同期的に認可ウィンドウを実行
fn run_auth_window_sync(
    install_url: &str,
    callback_base: Option<String>,
    timeout: Duration,
) -> AuthResult {
    use dioxus::desktop::tao::{
        dpi::LogicalSize,
        event::{Event, WindowEvent},
        event_loop::ControlFlow,
        platform::run_return::EventLoopExtRunReturn,
        window::WindowBuilder,
    };
    use dioxus::desktop::wry::WebViewBuilder;

    let mut event_loop = build_event_loop();

    let window = WindowBuilder::new()
        .with_title("Connect your Shopify store - ShopGenie")
        .with_inner_size(LogicalSize::new(900.0, 760.0))
        .with_resizable(true)
        .build(&event_loop)
        .map_err(|e| AuthWindowError::WindowCreation(e.to_string()))?;

    tracing::info!("🪟 Auth window created");

    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let captured_in_handler = captured.clone();

    let builder = WebViewBuilder::new()
        .with_url(install_url)
        .with_navigation_handler(move |uri: String| {
            if is_callback_url(&uri, callback_base.as_deref()) {
                tracing::info!(url = %strip_query(&uri), "✅ Authorization callback reached");
                *captured_in_handler.lock() = Some(uri);
                // コールバック先には遷移させない
                return false;
            }
            tracing::trace!(url = %strip_query(&uri), "🌐 Auth window navigating");
            true
        });

    #[cfg(target_os = "linux")]
    let webview = {
        use dioxus::desktop::tao::platform::unix::WindowExtUnix;
        use dioxus::desktop::wry::WebViewBuilderExtUnix;
        let container = window.default_vbox().ok_or_else(|| {
            AuthWindowError::WebViewCreation("GTK container is unavailable".to_string())
        })?;
        builder.build_gtk(container)
    };
    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window);
    let _webview = webview.map_err(|e| AuthWindowError::WebViewCreation(e.to_string()))?;

    tracing::info!("🌐 WebView created, navigating to authorization page...");

    let start_time = Instant::now();
    let mut outcome: Option<AuthResult> = None;

    event_loop.run_return(|event, _elwt, control_flow| {
        *control_flow = ControlFlow::WaitUntil(
            Instant::now() + Duration::from_millis(POLL_INTERVAL_MS),
        );

        if let Some(url) = captured.lock().take() {
            outcome = Some(Ok(url));
            *control_flow = ControlFlow::Exit;
            return;
        }

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                tracing::info!("🚪 Auth window closed by user");
                outcome = Some(Err(AuthWindowError::Cancelled));
                *control_flow = ControlFlow::Exit;
            }
            Event::MainEventsCleared if start_time.elapsed() > timeout => {
                tracing::warn!("⏰ Authorization timed out");
                outcome = Some(Err(AuthWindowError::Timeout));
                *control_flow = ControlFlow::Exit;
            }
            _ => {}
        }
    });

    outcome.unwrap_or(Err(AuthWindowError::Cancelled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_window_error_display() {
        assert_eq!(AuthWindowError::Timeout.to_string(), "Authorization timed out");
        assert_eq!(
            AuthWindowError::Cancelled.to_string(),
            "Authorization cancelled by user"
        );
    }

    #[test]
    fn test_navigator_builder() {
        let navigator = DesktopAuthNavigator::default()
            .with_callback_base("http://localhost:3000")
            .with_timeout(Duration::from_secs(30));
        assert_eq!(navigator.timeout, Duration::from_secs(30));
        assert_eq!(navigator.callback_base.as_deref(), Some("http://localhost:3000"));
        assert_eq!(
            DesktopAuthNavigator::default().timeout,
            Duration::from_secs(AUTH_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_is_callback_url() {
        let url = "http://localhost:3000/?shop=demo.myshopify.com&connected=true";
        assert!(is_callback_url(url, None));
        assert!(is_callback_url(url, Some("http://localhost:3000/")));
        assert!(!is_callback_url(url, Some("https://app.example.com")));
        assert!(!is_callback_url(
            "https://demo.myshopify.com/admin/oauth/authorize?client_id=x",
            None
        ));
    }
}
