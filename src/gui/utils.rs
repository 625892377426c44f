// GUI用ユーティリティ関数

use std::path::Path;

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::gui::config_manager::{LogConfig, WindowConfig};
use crate::gui::models::ChatMessage;

/// 時刻フォーマット
pub fn format_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// ログ初期化
///
/// 標準エラーへのcompact出力に加え、有効ならログディレクトリへ日次ローテーションで書き出す。
/// 戻り値のガードはプロセス終了まで保持すること。
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .or_else(|_| EnvFilter::try_new("info"))?;

    let mut guard = None;
    let file_layer = match (config.enable_file_logging, config.resolved_log_dir()) {
        (true, Some(log_dir)) => {
            std::fs::create_dir_all(&log_dir)?;
            if config.auto_cleanup_enabled {
                cleanup_old_logs(&log_dir, config.max_log_files as usize);
            }

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LogConfig::FILE_PREFIX)
                .filename_suffix("log")
                .build(&log_dir)?;
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// 古いログファイルを削除（新しいものから `keep` 件を残す）
pub fn cleanup_old_logs(log_dir: &Path, keep: usize) -> usize {
    let pattern = log_dir.join(format!("{}.*.log", LogConfig::FILE_PREFIX));
    let Some(pattern) = pattern.to_str() else {
        return 0;
    };

    let mut files: Vec<_> = match glob::glob(pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(e) => {
            warn!("⚠️ Invalid log file pattern: {}", e);
            return 0;
        }
    };
    if files.len() <= keep {
        return 0;
    }

    // 日付入りのファイル名なので名前順が古い順
    files.sort();
    let excess = files.len() - keep;
    let mut removed = 0;
    for path in files.into_iter().take(excess) {
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), "⚠️ Failed to remove old log: {}", e),
        }
    }
    debug!(removed = removed, "🧹 Old log files cleaned up");
    removed
}

/// デバッグ用のメッセージダンプ
pub fn dump_chat_message(message: &ChatMessage, context: &str) {
    debug!(
        context = context,
        id = %message.id,
        timestamp = %message.timestamp,
        role = ?message.role,
        payload = %message.payload.as_string(),
        content_length = message.content.len(),
        content_preview = %message.content.chars().take(50).collect::<String>(),
        "📨 Chat message appended"
    );
}

/// API リクエスト/レスポンスのログ
pub fn log_api_request(method: &str, url: &str) {
    debug!(method = method, url = %url, "📡 API request sent");
}

pub fn log_api_response(context: &str, status: u16, response_size: usize, duration_ms: u64) {
    if (200..300).contains(&status) {
        debug!(
            context = context,
            status = status,
            response_size_bytes = response_size,
            duration_ms = duration_ms,
            "📨 API response received"
        );
    } else {
        warn!(
            context = context,
            status = status,
            response_size_bytes = response_size,
            duration_ms = duration_ms,
            "⚠️ API responded with an error status"
        );
    }
}

/// UI更新のパフォーマンス測定
pub struct UiUpdateTimer {
    start: std::time::Instant,
    context: String,
}

impl UiUpdateTimer {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            start: std::time::Instant::now(),
            context: context.into(),
        }
    }
}

impl Drop for UiUpdateTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        if duration.as_millis() > 16 {
            // 60fps以下の場合警告
            warn!(
                context = %self.context,
                duration_ms = duration.as_millis(),
                "⚠️ Slow UI update detected"
            );
        } else {
            debug!(
                context = %self.context,
                duration_ms = duration.as_millis(),
                "✅ UI update completed"
            );
        }
    }
}

/// エラー詳細のログ
pub fn log_error_with_context(error: &anyhow::Error, context: &str) {
    error!(
        context = context,
        error = %error,
        error_chain = ?error.chain().collect::<Vec<_>>(),
        "❌ Error occurred"
    );
}

/// ウィンドウ設定の最低限の検証
pub fn validate_window_bounds(config: &mut WindowConfig) {
    if config.x < 0 {
        config.x = 100;
    }
    if config.y < 0 {
        config.y = 100;
    }
    if config.width < 480 {
        config.width = 480;
    }
    if config.height < 360 {
        config.height = 360;
    }
    info!(
        "🪟 Window: {}x{} at ({}, {}), maximized: {}",
        config.width, config.height, config.x, config.y, config.maximized
    );
}
