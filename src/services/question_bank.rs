//! 離線題庫
//!
//! AI 出題不可用或被關閉時的保底出題路徑。題庫內嵌在二進制裡，
//! 啟動時解析並校驗，運行期沒有失敗模式。

use std::collections::HashMap;

use anyhow::Result;
use rand::seq::SliceRandom;

use crate::models::{load_bank_file, Question};

/// 未收錄主題一律落到這個主題
pub const DEFAULT_TOPIC: &str = "HKDSE 代數";

const CORPUS: &str = include_str!("../../questions.toml");

/// 離線題庫
///
/// 按主題名索引的固定題目表。選題對每個主題的列表做均勻隨機。
#[derive(Debug)]
pub struct QuestionBank {
    topics: HashMap<String, Vec<Question>>,
}

impl QuestionBank {
    /// 加載內嵌題庫並校驗
    ///
    /// 題庫不合法（缺默認主題、空列表、答案字母越界、答案分佈失衡）
    /// 時直接啟動失敗，而不是等運行期出錯。
    pub fn load() -> Result<Self> {
        Self::from_toml(CORPUS)
    }

    fn from_toml(content: &str) -> Result<Self> {
        let bank = load_bank_file(content)?;

        let mut topics = HashMap::new();
        for topic in bank.topics {
            validate_topic(&topic.name, &topic.questions)?;
            topics.insert(topic.name, topic.questions);
        }

        if !topics.contains_key(DEFAULT_TOPIC) {
            anyhow::bail!("題庫缺少默認主題: {}", DEFAULT_TOPIC);
        }

        Ok(Self { topics })
    }

    /// 從指定主題均勻隨機選一題
    ///
    /// 未收錄的主題解析到默認主題，因此本方法總能返回題目。
    pub fn pick(&self, topic: &str) -> Question {
        let list = self
            .topics
            .get(topic)
            .unwrap_or_else(|| &self.topics[DEFAULT_TOPIC]);

        // 列表非空在加載時已校驗
        list.choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| list[0].clone())
    }

    /// 主題下的題目數（測試與日誌用）
    pub fn topic_len(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|l| l.len()).unwrap_or(0)
    }
}

/// 校驗單個主題的題目列表
///
/// 答案分佈要求：列表不少於 4 題時，任何一個字母的出現次數
/// 不得超過列表長度的一半，避免應試者利用位置偏差。
fn validate_topic(name: &str, questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        anyhow::bail!("主題 {} 的題目列表為空", name);
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for q in questions {
        if q.options.len() != 4
            || !["A", "B", "C", "D"].iter().all(|k| q.options.contains_key(*k))
        {
            anyhow::bail!("主題 {} 的題目「{}」選項不是 A-D 四個", name, q.question);
        }
        if !q.options.contains_key(&q.answer) {
            anyhow::bail!(
                "主題 {} 的題目「{}」答案 {} 不在選項中",
                name,
                q.question,
                q.answer
            );
        }
        *counts.entry(q.answer.as_str()).or_default() += 1;
    }

    if questions.len() >= 4 {
        let limit = questions.len() / 2;
        for (letter, count) in counts {
            if count > limit {
                anyhow::bail!(
                    "主題 {} 的正確答案過度集中在 {}（{}/{} 題）",
                    name,
                    letter,
                    count,
                    questions.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_corpus() {
        let bank = QuestionBank::load().unwrap();
        assert_eq!(bank.topic_len(DEFAULT_TOPIC), 6);
        assert_eq!(bank.topic_len("HKDSE 幾何"), 2);
    }

    #[test]
    fn test_unknown_topic_falls_back_to_default() {
        let bank = QuestionBank::load().unwrap();
        let q = bank.pick("不存在的主題");

        // 返回的題目必須來自默認主題的列表
        let defaults: Vec<String> = (0..200)
            .map(|_| bank.pick(DEFAULT_TOPIC).question)
            .collect();
        assert!(defaults.contains(&q.question));
    }

    #[test]
    fn test_pick_is_not_degenerate() {
        let bank = QuestionBank::load().unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(bank.pick(DEFAULT_TOPIC).question);
        }
        assert!(seen.len() > 1, "100 次選題只出現了一道題");
    }

    #[test]
    fn test_every_entry_is_well_formed() {
        let bank = QuestionBank::load().unwrap();
        for topic in [DEFAULT_TOPIC, "HKDSE 幾何"] {
            for _ in 0..50 {
                let q = bank.pick(topic);
                assert_eq!(q.options.len(), 4);
                assert!(q.options.contains_key(&q.answer));
                assert!(["A", "B", "C", "D"].contains(&q.answer.as_str()));
            }
        }
    }

    #[test]
    fn test_reject_unbalanced_corpus() {
        // 四題全部答 A：啟動時就該失敗
        let corpus = r#"
[[topics]]
name = "HKDSE 代數"

[[topics.questions]]
question = "1+1?"
answer = "A"
latex_steps = ""
[topics.questions.options]
A = "2"
B = "3"
C = "4"
D = "5"

[[topics.questions]]
question = "1+2?"
answer = "A"
latex_steps = ""
[topics.questions.options]
A = "3"
B = "4"
C = "5"
D = "6"

[[topics.questions]]
question = "1+3?"
answer = "A"
latex_steps = ""
[topics.questions.options]
A = "4"
B = "5"
C = "6"
D = "7"

[[topics.questions]]
question = "1+4?"
answer = "A"
latex_steps = ""
[topics.questions.options]
A = "5"
B = "6"
C = "7"
D = "8"
"#;
        let err = QuestionBank::from_toml(corpus).unwrap_err();
        assert!(err.to_string().contains("過度集中"));
    }

    #[test]
    fn test_reject_answer_outside_options() {
        let corpus = r#"
[[topics]]
name = "HKDSE 代數"

[[topics.questions]]
question = "1+1?"
answer = "E"
latex_steps = ""
[topics.questions.options]
A = "2"
B = "3"
C = "4"
D = "5"
"#;
        assert!(QuestionBank::from_toml(corpus).is_err());
    }

    #[test]
    fn test_reject_missing_default_topic() {
        let corpus = r#"
[[topics]]
name = "別的主題"

[[topics.questions]]
question = "1+1?"
answer = "A"
latex_steps = ""
[topics.questions.options]
A = "2"
B = "3"
C = "4"
D = "5"
"#;
        let err = QuestionBank::from_toml(corpus).unwrap_err();
        assert!(err.to_string().contains("默認主題"));
    }
}
