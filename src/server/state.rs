//! 服務端共享狀態

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::services::{GenerationService, GradingService, QuestionBank};

/// 所有 handler 共享的應用狀態
///
/// 只有不可變的服務實例，沒有跨請求的可變域狀態；
/// 學生的總分與題數由前端維護。
pub struct AppState {
    pub config: Config,
    pub bank: QuestionBank,
    pub generation: GenerationService,
    pub grading: GradingService,
}

impl AppState {
    /// 構建應用狀態
    ///
    /// 題庫在這裡加載並校驗，不合法直接啟動失敗。
    pub fn initialize(config: Config) -> Result<Arc<Self>> {
        let bank = QuestionBank::load()?;
        let generation = GenerationService::new(&config);
        let grading = GradingService::new(&config);

        Ok(Arc::new(Self {
            config,
            bank,
            generation,
            grading,
        }))
    }
}
