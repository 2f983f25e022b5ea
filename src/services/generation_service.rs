//! AI 出題服務
//!
//! 按學生滾動平均分計算有效難度，讓 LLM 生成全新選擇題。
//! 任何調用或解析失敗都折疊為 [`GenerationError`]，由 HTTP 層降級到題庫，
//! 不重試、對最終調用方不可見。

use chrono::Utc;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::models::{DifficultyTier, Question};
use crate::services::llm_service::{ChatOptions, LlmService};
use crate::utils::clean_json;

/// 防止生成雷同題目的敘事角色池
const SCENARIOS: [&str; 6] = ["小明", "小華", "工程師", "科學家", "建築師", "醫生"];

const GENERATION_TEMPERATURE: f32 = 0.85;
const GENERATION_MAX_TOKENS: u32 = 450;

/// AI 出題服務
pub struct GenerationService {
    llm: LlmService,
}

impl GenerationService {
    pub fn new(config: &Config) -> Self {
        Self {
            llm: LlmService::new(config),
        }
    }

    /// 生成一道全新題目
    ///
    /// # 參數
    /// - `topic`: 主題（如 "HKDSE 代數"）
    /// - `requested_tier`: 調用方傳入的難度，只原樣回顯在 JSON 模板裡
    /// - `student_average`: 滾動平均分，有效難度從這裡重新計算
    pub async fn generate(
        &self,
        topic: &str,
        requested_tier: DifficultyTier,
        student_average: f64,
    ) -> Result<Question, GenerationError> {
        // 有效難度按分數重算，不信任調用方
        let effective_tier = DifficultyTier::for_average(student_average);
        let variation_id = Utc::now().timestamp_millis() % 1000;
        let scenario = SCENARIOS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(SCENARIOS[0]);

        info!(
            "🤖 AI 出題 V{} {} {} 題（學生平均分: {:.0}）",
            variation_id, topic, effective_tier, student_average
        );

        let prompt = build_prompt(topic, requested_tier, effective_tier, scenario, variation_id);

        let options = ChatOptions {
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };

        let raw = self
            .llm
            .send_to_llm(&prompt, None, None, options)
            .await
            .map_err(|e| {
                warn!("出題調用失敗（主題: {}）: {}", topic, e);
                e
            })?;

        let question = parse_question(&raw)?;

        info!(
            "✅ AI 生成題目: {}",
            crate::utils::logging::truncate_text(&question.question, 60)
        );

        Ok(question)
    }
}

/// 構建出題提示詞
///
/// 句子部分用重算的有效難度，JSON 模板回顯調用方傳入的難度。
fn build_prompt(
    topic: &str,
    requested_tier: DifficultyTier,
    effective_tier: DifficultyTier,
    scenario: &str,
    variation_id: i64,
) -> String {
    format!(
        r#"{scenario}正在練習第{variation_id}題 HKDSE {topic} {effective_tier}題。

**生成全新題目**（數字、情境、表述完全不同）：
1. 返回純 JSON（不要其他文字）
2. 4個選項 A/B/C/D，1個正確答案
3. 題目含 LaTeX 數學符號
4. 隨機答案標明 answer: "A/B/C/D"
5. **絕對不要重複之前題目**

JSON 格式：
{{
  "question": "全新題目（含 LaTeX）",
  "options": {{
    "A": "選項A",
    "B": "選項B",
    "C": "選項C",
    "D": "選項D"
  }},
  "answer": "A/B/C/D",
  "latex_steps": "$$步驟1$$$$步驟2$$",
  "difficulty": "{requested_tier}"
}}"#
    )
}

/// 去圍欄後解析為 [`Question`]
///
/// 不做字段集的深度校驗，任何解析異常統一視為出題失敗。
fn parse_question(raw: &str) -> Result<Question, GenerationError> {
    let cleaned = clean_json(raw);
    let question: Question = serde_json::from_str(&cleaned)?;
    Ok(question)
}
