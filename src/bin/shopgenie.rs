use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use dioxus::prelude::*;
use shopgenie::{
    api::BackendClient,
    gui::{
        auth_window::DesktopAuthNavigator,
        components::MainWindow,
        config_manager::{self, BACKEND_URL_ENV},
        utils, ControllerConfig, ShopGenieController,
    },
    GuiError, ShopGenieResult,
};

/// ウィンドウ設定の保存用
static LAST_WINDOW_CONFIG: Mutex<Option<config_manager::WindowConfig>> = Mutex::new(None);

/// ShopGenie - AI-powered Shopify assistant
#[derive(Parser, Debug)]
#[command(name = "shopgenie", version, about)]
struct Cli {
    /// AIバックエンドのベースURL
    #[arg(long, env = BACKEND_URL_ENV)]
    backend_url: Option<String>,

    /// OAuth完了後のコールバックURL（ディープリンク起動時）
    #[arg(long)]
    callback_url: Option<String>,

    /// 起動時に設定するショップ
    #[arg(long)]
    shop: Option<String>,

    /// ログレベル (trace/debug/info/warn/error)
    #[arg(long)]
    log_level: Option<String>,

    /// 設定ファイルのパス
    #[arg(long)]
    config: Option<PathBuf>,

    /// デフォルト設定ファイルを書き出して終了
    #[arg(long)]
    write_default_config: bool,
}

fn app() -> Element {
    let window = dioxus::desktop::use_window();

    // ウィンドウ状態を定期的に更新（軽量な監視）
    use_effect({
        let window = window.clone();
        move || {
            let window = window.clone();
            spawn(async move {
                let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(1));
                loop {
                    interval.tick().await;

                    let current_size = window.inner_size();
                    let current_position = window.outer_position().unwrap_or_default();

                    let window_config = config_manager::WindowConfig {
                        width: current_size.width,
                        height: current_size.height,
                        x: current_position.x,
                        y: current_position.y,
                        maximized: window.is_maximized(),
                    };

                    if let Ok(mut last_config) = LAST_WINDOW_CONFIG.lock() {
                        *last_config = Some(window_config);
                    }
                }
            });
        }
    });

    rsx! {
        MainWindow {}
    }
}

fn main() -> ShopGenieResult<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => config_manager::ConfigManager::with_path(path.clone()),
        None => config_manager::ConfigManager::new()
            .map_err(|e| GuiError::Configuration(e.to_string()))?,
    };

    if cli.write_default_config {
        let path = config_manager
            .write_default_config()
            .map_err(|e| GuiError::Configuration(e.to_string()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = config_manager.load_config().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {e}");
        config_manager::AppConfig::default()
    });
    config.apply_env_overrides();
    config.apply_cli_overrides(cli.backend_url.clone(), cli.log_level.clone());

    // tokio-consoleの初期化（プロファイリング用）
    #[cfg(feature = "debug-tokio")]
    console_subscriber::init();

    #[cfg(not(feature = "debug-tokio"))]
    let _log_guard =
        utils::init_logging(&config.log).map_err(|e| GuiError::Logging(e.to_string()))?;

    tracing::info!("🎬 Starting ShopGenie");
    tracing::info!(
        backend = %config.backend.base_url,
        config_path = %config_manager.get_config_file_path().display(),
        "⚙️ Configuration loaded"
    );

    utils::validate_window_bounds(&mut config.window);

    let backend = BackendClient::new(&config.backend.base_url, config.backend.timeout())?;
    let controller = ShopGenieController::new(
        Arc::new(backend),
        Arc::new(DesktopAuthNavigator::default()),
        ControllerConfig {
            product_limit: config.products.default_limit,
        },
    );

    if let Some(shop) = cli.shop.as_deref() {
        match controller.set_shop(shop) {
            Ok(normalized) => tracing::info!(shop = %normalized, "🏪 Shop set from command line"),
            Err(e) => tracing::warn!("⚠️ Ignoring --shop: {}", e),
        }
    }
    if let Some(url) = cli.callback_url.as_deref() {
        if !controller.apply_callback_url(url) {
            tracing::warn!(url, "⚠️ Callback URL did not contain a connected shop");
        }
    }

    let launch_builder = dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::tao::window::WindowBuilder::new()
                    .with_title("ShopGenie")
                    .with_inner_size(dioxus::desktop::tao::dpi::LogicalSize::new(
                        config.window.width as f64,
                        config.window.height as f64,
                    ))
                    .with_position(dioxus::desktop::tao::dpi::LogicalPosition::new(
                        config.window.x as f64,
                        config.window.y as f64,
                    ))
                    .with_maximized(config.window.maximized)
                    .with_resizable(true),
            ),
        )
        .with_context(controller)
        .with_context(config.theme.clone());

    // Ctrl+Cシグナルハンドラー
    let exit_config_manager = config_manager.clone();
    ctrlc::set_handler(move || {
        tracing::info!("🛑 Received shutdown signal");
        save_window_config_on_exit(&exit_config_manager);
        std::process::exit(0);
    })
    .map_err(|e| GuiError::Configuration(format!("Failed to set signal handler: {}", e)))?;

    launch_builder.launch(app);

    save_window_config_on_exit(&config_manager);

    tracing::info!("👋 ShopGenie shutting down");
    Ok(())
}

/// 終了時にウィンドウ設定を保存
fn save_window_config_on_exit(config_manager: &config_manager::ConfigManager) {
    let Ok(last_config_guard) = LAST_WINDOW_CONFIG.lock() else {
        return;
    };
    let Some(window_config) = last_config_guard.as_ref() else {
        tracing::warn!("⚠️ No window configuration recorded, skipping save");
        return;
    };

    // 既存の設定を読み込み、ウィンドウ設定のみ更新
    match config_manager.load_config() {
        Ok(mut config) => {
            config.window = window_config.clone();
            if let Err(e) = config_manager.save_config(&config) {
                utils::log_error_with_context(&e, "save window configuration");
            } else {
                tracing::info!(
                    "💾 Saved window configuration: {}x{} at ({}, {}), maximized: {}",
                    config.window.width,
                    config.window.height,
                    config.window.x,
                    config.window.y,
                    config.window.maximized
                );
            }
        }
        Err(e) => tracing::warn!("⚠️ Failed to read existing configuration: {}", e),
    }
}
