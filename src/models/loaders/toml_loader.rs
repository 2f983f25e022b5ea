use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::question::Question;

/// 題庫 TOML 文件的頂層結構
#[derive(Debug, Deserialize)]
pub struct BankFile {
    pub topics: Vec<TopicEntry>,
}

/// 一個主題及其題目列表
#[derive(Debug, Deserialize)]
pub struct TopicEntry {
    pub name: String,
    pub questions: Vec<Question>,
}

/// 解析題庫 TOML 內容
pub fn load_bank_file(content: &str) -> Result<BankFile> {
    let bank: BankFile = toml::from_str(content).context("無法解析題庫 TOML")?;

    if bank.topics.is_empty() {
        anyhow::bail!("題庫中沒有任何主題");
    }

    Ok(bank)
}
