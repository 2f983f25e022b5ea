use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 一道選擇題
///
/// 字段即接口返回的扁平 JSON：題幹可含 LaTeX，選項固定 A–D 四個，
/// `answer` 是正確選項的字母。題庫條目不帶 `difficulty`，反序列化時取默認值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: BTreeMap<String, String>,
    pub answer: String,
    pub latex_steps: String,
    #[serde(default)]
    pub difficulty: DifficultyTier,
}

/// 難度檔位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyTier {
    /// 根據滾動平均分計算難度檔位
    ///
    /// 低於 60 分出簡單題，高於 85 分出難題，其餘（含 60 和 85 本身）出中等題。
    pub fn for_average(average_score: f64) -> Self {
        if average_score < 60.0 {
            DifficultyTier::Easy
        } else if average_score > 85.0 {
            DifficultyTier::Hard
        } else {
            DifficultyTier::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
