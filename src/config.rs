/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 服務監聽端口
    pub server_port: u16,
    /// 上傳圖片的臨時目錄
    pub upload_dir: String,
    /// 允許跨域的前端地址
    pub allowed_origin: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 出題用的文字模型
    pub llm_model_name: String,
    /// 批改手寫答案用的視覺模型
    pub vision_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            upload_dir: "uploads".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.mistral.ai/v1".to_string(),
            llm_model_name: "mistral-large-latest".to_string(),
            vision_model_name: "pixtral-12b-2409".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            server_port: std::env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.server_port),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),
            allowed_origin: std::env::var("ALLOWED_ORIGIN").unwrap_or(default.allowed_origin),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            vision_model_name: std::env::var("VISION_MODEL_NAME").unwrap_or(default.vision_model_name),
        }
    }

    /// API Key 是否已配置（健康檢查用）
    pub fn service_ready(&self) -> bool {
        !self.llm_api_key.is_empty()
    }
}
