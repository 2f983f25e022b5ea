//! 計分引擎
//!
//! 對一次作答給出對/錯、得分和固定反饋文字。引擎本身無狀態，
//! 總分與題數的累計由調用方維護。

use serde::Serialize;

use crate::models::Question;

/// 一次作答的結果
#[derive(Debug, Clone, Serialize)]
pub struct ScoreOutcome {
    pub is_correct: bool,
    pub feedback: String,
    pub score: u32,
}

/// 給一次作答計分
///
/// 作答字母與正確答案做大小寫不敏感比較；得分只有 100 或 0，沒有部分分。
/// 反饋文字只由對錯決定，與選了哪個錯誤選項無關。
pub fn score(question: &Question, submitted_key: &str) -> ScoreOutcome {
    let is_correct = submitted_key.trim().eq_ignore_ascii_case(&question.answer);

    let feedback = if is_correct {
        "✅ 完全正確！概念掌握很好！".to_string()
    } else {
        format!(
            "❌ 正確答案：{}\n💡 提示：重新檢查計算步驟",
            question.answer
        )
    };

    ScoreOutcome {
        is_correct,
        feedback,
        score: if is_correct { 100 } else { 0 },
    }
}
