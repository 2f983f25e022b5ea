//! LLM 回覆的 JSON 清洗
//!
//! 上游被要求返回純 JSON，但實際偶爾仍會包在 Markdown 代碼塊裡，
//! 解析前先做一次去圍欄處理。

use regex::Regex;

/// 去掉可選的代碼圍欄（含語言標記）並修剪首尾空白
///
/// 合法的非圍欄 JSON 原樣通過。
pub fn clean_json(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    if let Ok(re) = Regex::new(r"^```[a-zA-Z]*\n?") {
        text = re.replace(&text, "").to_string();
    }
    if let Ok(re) = Regex::new(r"\n?```$") {
        text = re.replace(&text, "").to_string();
    }

    text.trim().to_string()
}
