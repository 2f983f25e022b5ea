//! LLM 服務 - 業務能力層
//!
//! 只負責「調用生成式模型」這一件事，不關心出題/批改流程
//!
//! ## 技術棧
//! - 使用 `async-openai` crate 進行 API 調用
//! - 支持自定義 API 端點和模型
//! - 兼容 OpenAI Chat Completions API 的服務（如 Mistral）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// 單次調用的採樣參數
#[derive(Clone, Copy, Debug)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1024,
        }
    }
}

/// LLM 服務
///
/// 職責：
/// - 封裝一次阻塞式的 Chat Completions 調用
/// - 支持文本消息和內嵌圖片（批改手寫答案用）
/// - 不重試、不設超時：調用要麼完成要麼直接失敗
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 創建新的 LLM 服務（使用配置裡的文字模型）
    pub fn new(config: &Config) -> Self {
        Self::with_model(config, &config.llm_model_name)
    }

    /// 創建指定模型的 LLM 服務（批改用視覺模型時走這裡）
    pub fn with_model(config: &Config, model_name: impl Into<String>) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: model_name.into(),
        }
    }

    /// 通用的 LLM 調用函數
    ///
    /// # 參數
    /// - `user_message`: 用戶消息內容
    /// - `system_message`: 系統消息（可選）
    /// - `imgs`: 內嵌圖片 URL 列表（可選，支持 data: URL），會追加到用戶消息中
    /// - `options`: 採樣參數
    ///
    /// # 返回
    /// 返回 LLM 的響應內容（已 trim 的字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        imgs: Option<&[String]>,
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        debug!("調用 LLM API，模型: {}", self.model_name);
        debug!("用戶消息長度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(LlmError::Api)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 構建用戶消息內容（支持圖片）
        let user_msg = match imgs {
            Some(img_urls) if !img_urls.is_empty() => {
                debug!("使用 Vision API，包含 {} 張圖片", img_urls.len());

                let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> =
                    Vec::new();

                content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText {
                        text: user_message.to_string(),
                    },
                ));

                for url in img_urls.iter() {
                    content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: url.clone(),
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    ));
                }

                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(
                        content_parts,
                    ))
                    .build()
                    .map_err(LlmError::Api)?
            }
            _ => ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(LlmError::Api)?,
        };

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(options.temperature)
            .max_tokens(options.max_tokens)
            .build()
            .map_err(LlmError::Api)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 調用失敗: {}", e);
            LlmError::Api(e)
        })?;

        debug!("LLM API 調用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(LlmError::EmptyContent)?;

        Ok(content.trim().to_string())
    }
}
