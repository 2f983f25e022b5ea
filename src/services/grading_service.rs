//! 手寫答案批改管線
//!
//! 接收上傳的答案照片，落盤到臨時文件、讀回並以 base64 內嵌進視覺模型的
//! 批改請求，解析其 JSON 判定後回傳。臨時文件在任何退出路徑上都會釋放。
//! 批改沒有離線替代，失敗按類別直接回報調用方。

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::GradingError;
use crate::services::llm_service::{ChatOptions, LlmService};
use crate::utils::clean_json;

/// 調用方未指定時批改的參考題目
const DEFAULT_REFERENCE_PROBLEM: &str = "x² - 5x + 6 = 0";
/// 參考題目的標準答案，也是回覆缺 correctAnswer 字段時的默認值
const DEFAULT_CORRECT_ANSWER: &str = "x=2, x=3";

/// 批改結果裡的固定置信度
///
/// 佔位值：上游不回報真實置信度，這個字段始終是常量，不是計算出的指標。
pub const GRADING_CONFIDENCE: u32 = 95;

/// 一次批改的結果，字段名即接口返回的 JSON 鍵
#[derive(Debug, Clone, Serialize)]
pub struct GradingResult {
    #[serde(rename = "extractedAnswer")]
    pub extracted_answer: String,
    pub score: u32,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    pub feedback: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    pub confidence: u32,
    pub model: String,
}

/// 上游回覆的 JSON 結構，所有字段都允許缺省
#[derive(Debug, Deserialize)]
struct GradingReply {
    #[serde(default)]
    extracted: Option<String>,
    #[serde(default)]
    score: Option<u32>,
    #[serde(default, rename = "isCorrect")]
    is_correct: Option<bool>,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default, rename = "correctAnswer")]
    correct_answer: Option<String>,
}

/// 批改服務
pub struct GradingService {
    llm: LlmService,
    model_name: String,
    upload_dir: PathBuf,
}

impl GradingService {
    pub fn new(config: &Config) -> Self {
        Self {
            llm: LlmService::with_model(config, &config.vision_model_name),
            model_name: config.vision_model_name.clone(),
            upload_dir: PathBuf::from(&config.upload_dir),
        }
    }

    /// 批改一張手寫答案照片
    ///
    /// # 參數
    /// - `image_bytes`: 圖片內容，HTTP 層保證非空
    /// - `reference`: 批改針對的題目，不傳時用固定參考題
    ///
    /// 單次阻塞調用，不重試；上游失敗按 [`GradingError`] 分類返回。
    pub async fn grade(
        &self,
        image_bytes: &[u8],
        reference: Option<&str>,
    ) -> Result<GradingResult, GradingError> {
        // 落盤到臨時文件再讀回；文件隨 upload 離開作用域自動刪除，
        // 提前 return 的失敗路徑也不例外
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| {
                warn!("創建上傳目錄失敗: {}", e);
                GradingError::Transient
            })?;

        let upload = NamedTempFile::new_in(&self.upload_dir).map_err(|e| {
            warn!("創建臨時文件失敗: {}", e);
            GradingError::Transient
        })?;

        tokio::fs::write(upload.path(), image_bytes)
            .await
            .map_err(|e| {
                warn!("寫入臨時文件失敗: {}", e);
                GradingError::Transient
            })?;

        let buffer = tokio::fs::read(upload.path()).await.map_err(|e| {
            warn!("讀取臨時文件失敗: {}", e);
            GradingError::Transient
        })?;

        let image_size_kb = buffer.len() / 1024;
        info!("🔍 開始批改手寫答案");
        info!("📏 圖片大小: {}KB", image_size_kb);

        let image_url = format!("data:image/jpeg;base64,{}", BASE64.encode(&buffer));
        let prompt = build_grading_prompt(reference.unwrap_or(DEFAULT_REFERENCE_PROBLEM));

        let raw = self
            .llm
            .send_to_llm(&prompt, None, Some(&[image_url]), ChatOptions::default())
            .await
            .map_err(|e| {
                warn!("批改調用失敗（圖片 {}KB）: {}", image_size_kb, e);
                GradingError::classify(&e)
            })?;

        let result = map_reply(&raw, &self.model_name)?;

        info!(
            "✅ 批改完成: {} 分，{}",
            result.score,
            if result.is_correct { "正確" } else { "不正確" }
        );

        Ok(result)
    }
}

/// 構建批改提示詞，要求上游只返回約定結構的 JSON
fn build_grading_prompt(reference: &str) -> String {
    format!(
        r#"請仔細識別這張學生手寫數學答案照片，批改這題：**{reference}**

要求返回嚴格 JSON 格式（不要其他文字）：
{{
  "extracted": "識別出的完整答案文字",
  "score": 數字分數0-100,
  "isCorrect": true/false,
  "feedback": "批改意見（繁體中文）",
  "correctAnswer": "正確答案"
}}"#
    )
}

/// 去圍欄、解析上游回覆並補齊缺省字段
///
/// 回覆無法解析時和其他未分類失敗一樣按可重試處理。
fn map_reply(raw: &str, model_name: &str) -> Result<GradingResult, GradingError> {
    let cleaned = clean_json(raw);
    let reply: GradingReply = serde_json::from_str(&cleaned).map_err(|e| {
        warn!("批改回覆無法解析: {}", e);
        GradingError::Transient
    })?;

    Ok(GradingResult {
        extracted_answer: reply.extracted.unwrap_or_else(|| "無法識別".to_string()),
        score: reply.score.unwrap_or(0),
        is_correct: reply.is_correct.unwrap_or(false),
        feedback: reply.feedback.unwrap_or_else(|| "分析完成".to_string()),
        correct_answer: reply
            .correct_answer
            .unwrap_or_else(|| DEFAULT_CORRECT_ANSWER.to_string()),
        confidence: GRADING_CONFIDENCE,
        model: model_name.to_string(),
    })
}
