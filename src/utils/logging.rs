/// 日誌工具模塊
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日誌
///
/// 默認 info 級別，可用 RUST_LOG 覆蓋。重複調用不報錯（測試裡會多次初始化）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// 截斷長文本用於日誌顯示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 記錄服務啟動信息
pub fn log_startup(port: u16, ready: bool) {
    tracing::info!("{}", "=".repeat(60));
    tracing::info!("🚀 出題批改服務啟動: http://localhost:{}", port);
    tracing::info!(
        "🔑 LLM API Key: {}",
        if ready { "已配置" } else { "未配置（僅題庫模式）" }
    );
    tracing::info!("{}", "=".repeat(60));
}
