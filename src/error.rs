//! 應用程序錯誤類型
//!
//! 出題失敗（[`GenerationError`]）在內部降級到離線題庫，不會對外暴露；
//! 批改失敗（[`GradingError`]）沒有離線替代，按類別直接回報給調用方。

use async_openai::error::OpenAIError;
use thiserror::Error;

/// 對外（HTTP 層）的錯誤類型
#[derive(Debug, Error)]
pub enum AppError {
    /// 請求缺少必要內容（如未上傳圖片）
    #[error("{0}")]
    Validation(String),
    /// 批改服務失敗
    #[error(transparent)]
    Grading(#[from] GradingError),
}

/// LLM 調用錯誤
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API 調用失敗: {0}")]
    Api(#[from] OpenAIError),
    #[error("LLM 返回內容為空")]
    EmptyContent,
}

/// 出題服務錯誤
///
/// 所有變體的處理方式相同：記日誌後改用題庫出題。
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("出題 API 調用失敗: {0}")]
    ApiCall(#[from] LlmError),
    #[error("LLM 返回的題目無法解析: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 批改服務錯誤，按上游失敗原因分類
///
/// 每個變體對應一條給學生/運維看的提示訊息。
#[derive(Debug, Error)]
pub enum GradingError {
    #[error("❌ API Key 錯誤，請檢查 .env 設定")]
    Auth,
    #[error("❌ API 額度不足，請升級方案")]
    Quota,
    #[error("❌ 手寫辨識失敗，請重試")]
    Transient,
}

impl GradingError {
    /// 對上游錯誤分類：先看結構化的錯誤類型字段，再退回訊息文字匹配
    pub fn classify(err: &LlmError) -> Self {
        if let LlmError::Api(OpenAIError::ApiError(api)) = err {
            if let Some(kind) = api.r#type.as_deref() {
                if kind.contains("authentication") || kind.contains("invalid_api_key") {
                    return GradingError::Auth;
                }
                if kind.contains("insufficient_quota") || kind.contains("quota") {
                    return GradingError::Quota;
                }
            }
        }
        Self::classify_message(&err.to_string())
    }

    /// 訊息文字匹配，上游不提供結構化錯誤碼時的最後手段
    pub fn classify_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("api key") || lower.contains("unauthorized") {
            GradingError::Auth
        } else if lower.contains("quota") {
            GradingError::Quota
        } else {
            GradingError::Transient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message_auth() {
        assert!(matches!(
            GradingError::classify_message("Invalid API key provided"),
            GradingError::Auth
        ));
        assert!(matches!(
            GradingError::classify_message("401 Unauthorized"),
            GradingError::Auth
        ));
    }

    #[test]
    fn test_classify_message_quota() {
        assert!(matches!(
            GradingError::classify_message("You exceeded your current quota"),
            GradingError::Quota
        ));
    }

    #[test]
    fn test_classify_message_fallback_is_transient() {
        assert!(matches!(
            GradingError::classify_message("connection reset by peer"),
            GradingError::Transient
        ));
        assert!(matches!(
            GradingError::classify_message(""),
            GradingError::Transient
        ));
    }

    #[test]
    fn test_distinct_user_messages() {
        let msgs = [
            GradingError::Auth.to_string(),
            GradingError::Quota.to_string(),
            GradingError::Transient.to_string(),
        ];
        assert_ne!(msgs[0], msgs[1]);
        assert_ne!(msgs[1], msgs[2]);
        assert_ne!(msgs[0], msgs[2]);
    }
}
