use anyhow::Result;

use hkdse_quiz_backend::server::{self, AppState};
use hkdse_quiz_backend::utils::logging;
use hkdse_quiz_backend::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌
    logging::init();

    // 加載配置
    let config = Config::from_env();

    // 構建狀態（題庫在此校驗，不合法直接退出）並啟動服務
    let state = AppState::initialize(config)?;
    server::serve(state).await?;

    Ok(())
}
