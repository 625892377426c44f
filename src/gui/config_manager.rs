//! アプリケーション設定管理モジュール
//!
//! XDGディレクトリを使用した設定ファイルの読み込みと保存を提供します。
//! 優先順位は CLI > 環境変数 > 設定ファイル > デフォルト値。

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::api::DEFAULT_BACKEND_URL;
use crate::gui::controller::DEFAULT_PRODUCT_LIMIT;

/// バックエンドURLを上書きする環境変数
pub const BACKEND_URL_ENV: &str = "SHOPGENIE_BACKEND_URL";

/// バックエンド接続設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// リクエストのタイムアウト秒数（0で無制限）
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.request_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.request_timeout_secs))
    }
}

/// 商品一覧の設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProductsConfig {
    pub default_limit: u32,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PRODUCT_LIMIT,
        }
    }
}

/// ウィンドウ設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
    pub maximized: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 860,
            x: 100,
            y: 100,
            maximized: false,
        }
    }
}

/// ログ設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// カスタムログディレクトリ（Noneの場合はXDGデフォルト使用）
    pub log_dir: Option<PathBuf>,
    /// ログレベル (trace/debug/info/warn/error)
    pub log_level: String,
    /// ファイル出力有効化
    pub enable_file_logging: bool,
    /// 保存するログファイル数上限
    pub max_log_files: u32,
    /// 古いログファイル自動削除
    pub auto_cleanup_enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_level: "info".to_string(),
            enable_file_logging: true,
            max_log_files: 30,
            auto_cleanup_enabled: true,
        }
    }
}

impl LogConfig {
    pub const FILE_PREFIX: &'static str = "shopgenie";

    /// 実際に使うログディレクトリ
    pub fn resolved_log_dir(&self) -> Option<PathBuf> {
        self.log_dir.clone().or_else(|| {
            ProjectDirs::from("dev", "shopgenie", "shopgenie")
                .map(|dirs| dirs.data_dir().join("logs"))
        })
    }
}

/// テーマ設定
///
/// 色は `"H S L%"` 形式のHSL値、または任意のCSSカラー文字列。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark_mode: bool,
    /// 前景色（HSL値）
    pub foreground: String,
    /// アクセント色（HSL値）
    pub accent: String,
    /// ドットの色を直接指定する場合
    pub dot_color: Option<String>,
    /// グロー色を直接指定する場合
    pub glow_color: Option<String>,
    /// 背景グラデーションの不透明度
    pub background_opacity: Option<f64>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            foreground: "222 47% 11%".to_string(),
            accent: "199 100% 50%".to_string(),
            dot_color: None,
            glow_color: None,
            background_opacity: None,
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub products: ProductsConfig,
    pub window: WindowConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

impl AppConfig {
    /// 環境変数による上書き
    pub fn apply_env_overrides(&mut self) {
        self.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
    }

    fn apply_backend_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            debug!(base_url = %url, "🔧 Backend URL overridden");
            self.backend.base_url = url;
        }
    }

    /// CLI引数による上書き（環境変数より優先）
    pub fn apply_cli_overrides(&mut self, backend_url: Option<String>, log_level: Option<String>) {
        self.apply_backend_override(backend_url);
        if let Some(level) = log_level {
            self.log.log_level = level;
        }
    }
}

/// 設定管理マネージャー
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: Self::get_config_path()?,
        })
    }

    /// 任意のパスを使う設定マネージャー
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// XDGディレクトリに基づく設定ファイルパスを取得
    fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "shopgenie", "shopgenie")
            .context("Failed to get project directories")?;

        let config_file = project_dirs.config_dir().join("config.toml");
        debug!("Config file path: {}", config_file.display());

        Ok(config_file)
    }

    /// 設定を読み込み
    pub fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!(
                "Config file not found, using default settings: {}",
                self.config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let config_content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: AppConfig = toml::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        info!(
            "✅ Configuration loaded from: {}",
            self.config_path.display()
        );

        Ok(config)
    }

    /// 設定を保存
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let config_content =
            toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, config_content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        info!("💾 Configuration saved to: {}", self.config_path.display());

        Ok(())
    }

    /// デフォルト設定を書き出す
    pub fn write_default_config(&self) -> Result<&Path> {
        self.save_config(&AppConfig::default())?;
        Ok(&self.config_path)
    }

    pub fn get_config_file_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_load_nonexistent_file() {
        let temp_dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nonexistent.toml"));

        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded, AppConfig::default());
        assert_eq!(loaded.backend.base_url, "http://localhost:8000");
        assert_eq!(loaded.products.default_limit, 10);
    }

    #[test]
    fn test_config_manager_save_load() {
        let temp_dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nested/config.toml"));

        let mut original = AppConfig::default();
        original.backend.base_url = "https://api.example.com".to_string();
        original.products.default_limit = 25;
        original.theme.dark_mode = true;

        manager.save_config(&original).unwrap();
        assert_eq!(manager.load_config().unwrap(), original);
    }

    #[test]
    fn test_config_load_partial_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(
            &config_path,
            r#"
[backend]
base_url = "http://127.0.0.1:9000"

[theme]
dark_mode = true
"#,
        )
        .unwrap();

        let loaded = ConfigManager::with_path(config_path).load_config().unwrap();

        // 省略されたフィールドはデフォルト値になる
        assert_eq!(loaded.backend.base_url, "http://127.0.0.1:9000");
        assert_eq!(loaded.backend.request_timeout_secs, 60);
        assert!(loaded.theme.dark_mode);
        assert_eq!(loaded.products, ProductsConfig::default());
    }

    #[test]
    fn test_config_load_corrupted_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("corrupted.toml");
        std::fs::write(&config_path, "invalid toml content [unclosed section").unwrap();

        let result = ConfigManager::with_path(config_path).load_config();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }

    #[test]
    fn test_cli_override_wins_over_env_value() {
        let mut config = AppConfig::default();
        config.apply_backend_override(Some("http://from-env:1".to_string()));
        config.apply_cli_overrides(Some("http://from-cli:2".to_string()), None);
        assert_eq!(config.backend.base_url, "http://from-cli:2");

        // 空文字は無視
        config.apply_cli_overrides(Some("  ".to_string()), Some("debug".to_string()));
        assert_eq!(config.backend.base_url, "http://from-cli:2");
        assert_eq!(config.log.log_level, "debug");
    }

    #[test]
    fn test_backend_timeout_zero_disables() {
        let mut backend = BackendConfig::default();
        assert_eq!(backend.timeout(), Some(std::time::Duration::from_secs(60)));
        backend.request_timeout_secs = 0;
        assert_eq!(backend.timeout(), None);
    }

    #[test]
    fn test_write_default_config() {
        let temp_dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let path = manager.write_default_config().unwrap().to_path_buf();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("[backend]"));
        assert!(content.contains("default_limit = 10"));
    }
}
