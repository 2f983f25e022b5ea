//! # HKDSE Quiz Backend
//!
//! 自適應選擇題練習的後端服務
//!
//! ## 架構設計
//!
//! ### ① 配置與基礎（config / error / utils）
//! - `Config` - 環境變量驅動的配置
//! - `error` - 域錯誤類型：出題失敗內部降級，批改失敗分類上報
//! - `utils::json` - LLM 回覆的去圍欄清洗
//!
//! ### ② 模型層（models）
//! - `Question` / `DifficultyTier` - 題目與難度檔位（含按平均分調檔）
//! - `loaders` - 內嵌 TOML 題庫的解析
//!
//! ### ③ 業務能力層（services）
//! - `LlmService` - 唯一的外部模型調用能力（文本 + 視覺）
//! - `GenerationService` - AI 出題
//! - `QuestionBank` - 離線題庫（保底路徑，運行期永不失敗）
//! - `scoring_service` - 計分引擎
//! - `GradingService` - 手寫答案批改管線
//!
//! ### ④ 接口層（server）
//! - `AppState` + `create_router` - axum 路由與共享狀態
//!
//! 每個請求獨立處理，核心裡沒有跨請求的可變狀態；總分累計在調用方。

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

// 重新導出常用類型
pub use config::Config;
pub use error::{AppError, GenerationError, GradingError};
pub use models::{DifficultyTier, Question};
pub use server::{create_router, AppState};
pub use services::{GenerationService, GradingService, QuestionBank};
