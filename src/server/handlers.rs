//! HTTP 接口層
//!
//! 出題接口永不失敗：AI 出題的任何問題都在這裡降級到題庫。
//! 批改接口的失敗按 [`AppError`] 映射為帶分類訊息的錯誤響應。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{DifficultyTier, Question};
use crate::server::state::AppState;
use crate::services::grading_service::GradingResult;
use crate::services::{scoring_service, DEFAULT_TOPIC};
use crate::utils::logging::truncate_text;

/// 多部分表單裡圖片字段的名字
const IMAGE_FIELD: &str = "answerImage";
/// 可選的題目字段：傳了就按這道題批改
const REFERENCE_FIELD: &str = "question";
/// Marking scheme 接口的 PDF 字段
const PDF_FIELD: &str = "pdfFile";

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default, rename = "useAI")]
    pub use_ai: bool,
    #[serde(default = "default_student_score", rename = "studentScore")]
    pub student_score: f64,
    #[serde(default)]
    pub difficulty: DifficultyTier,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

fn default_student_score() -> f64 {
    70.0
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question: Question,
    #[serde(rename = "studentAnswer")]
    pub student_answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    pub feedback: String,
    pub score: u32,
    #[serde(rename = "totalScore")]
    pub total_score: u32,
}

#[derive(Debug, Serialize)]
pub struct MarkingScheme {
    #[serde(rename = "markingText")]
    pub marking_text: String,
    #[serde(rename = "extractedAnswers")]
    pub extracted_answers: Vec<String>,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(rename = "serviceReady")]
    pub service_ready: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Grading(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// POST /generate-question
///
/// `useAI` 為 false 或未配置 API Key 時直接走題庫；
/// AI 出題失敗也降級到題庫，對調用方不可見。
pub async fn generate_question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateQuestionRequest>,
) -> Json<Question> {
    if req.use_ai && state.config.service_ready() {
        match state
            .generation
            .generate(&req.topic, req.difficulty, req.student_score)
            .await
        {
            Ok(question) => return Json(question),
            Err(e) => warn!("AI 出題失敗，降級到題庫（主題: {}）: {}", req.topic, e),
        }
    }

    let question = state.bank.pick(&req.topic);
    info!(
        "🎯 題庫出題 {}: {}",
        req.topic,
        truncate_text(&question.question, 60)
    );
    Json(question)
}

/// POST /submit-answer
///
/// 計分無狀態；`totalScore` 與本題得分相同，累計由前端負責。
pub async fn submit_answer(Json(req): Json<SubmitAnswerRequest>) -> Json<SubmitAnswerResponse> {
    let outcome = scoring_service::score(&req.question, &req.student_answer);

    info!(
        "📝 學生答 {}，正確答案 {}：{}",
        req.student_answer,
        req.question.answer,
        if outcome.is_correct { "✅" } else { "❌" }
    );

    Json(SubmitAnswerResponse {
        is_correct: outcome.is_correct,
        total_score: outcome.score,
        score: outcome.score,
        feedback: outcome.feedback,
    })
}

/// POST /grade-handwritten-answer
///
/// 多部分表單：`answerImage` 必填，`question` 可選（指定批改的題目）。
pub async fn grade_handwritten_answer(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GradingResult>, AppError> {
    let mut image: Option<Bytes> = None;
    let mut reference: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("表單解析失敗: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                image = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("讀取圖片失敗: {}", e)))?,
                );
            }
            REFERENCE_FIELD => {
                reference = field.text().await.ok().filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("請上傳圖片".to_string()))?;

    let result = state.grading.grade(&image, reference.as_deref()).await?;
    Ok(Json(result))
}

/// POST /parse-marking-scheme
///
/// 暫時返回固定數據（PDF 轉 Base64 較複雜），接口形狀與正式版一致。
pub async fn parse_marking_scheme(
    mut multipart: Multipart,
) -> Result<Json<MarkingScheme>, AppError> {
    let mut pdf: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("表單解析失敗: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == PDF_FIELD {
            pdf = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("讀取 PDF 失敗: {}", e)))?,
            );
        }
    }

    let pdf = pdf
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("請上傳 PDF".to_string()))?;

    info!("📄 解析 Marking Scheme: {}KB", pdf.len() / 1024);

    Ok(Json(MarkingScheme {
        marking_text: "Model Answer: x²-5x+6=0 → (x-2)(x-3)=0 → x=2, x=3 (Full marks)"
            .to_string(),
        extracted_answers: vec!["x=2, x=3".to_string(), "(x-2)(x-3)=0".to_string()],
        total_pages: 1,
    }))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    info!("🏥 Health check OK");
    Json(HealthResponse {
        status: "OK",
        service_ready: state.config.service_ready(),
    })
}
