//! HTTP 接口測試
//!
//! 不觸網：useAI 未開或 API Key 未配置時出題全部走題庫，
//! 批改只測缺圖片的校驗路徑。

use std::collections::HashSet;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use hkdse_quiz_backend::{create_router, AppState, Config};

/// 測試用服務：題庫模式（無 API Key），上傳目錄指向臨時目錄
fn test_server() -> (TestServer, TempDir) {
    let upload_dir = tempfile::tempdir().expect("創建臨時目錄失敗");
    let config = Config {
        upload_dir: upload_dir.path().to_string_lossy().to_string(),
        ..Default::default()
    };
    let state = AppState::initialize(config).expect("題庫加載失敗");
    let server = TestServer::new(create_router(state)).expect("啟動測試服務失敗");
    (server, upload_dir)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _dir) = test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["serviceReady"], false);
}

#[tokio::test]
async fn test_generate_question_serves_from_bank() {
    let (server, _dir) = test_server();

    let response = server
        .post("/generate-question")
        .json(&json!({"topic": "HKDSE 代數", "useAI": false}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let options = body["options"].as_object().expect("options 不是對象");
    assert_eq!(options.len(), 4);
    for key in ["A", "B", "C", "D"] {
        assert!(options.contains_key(key));
    }

    let answer = body["answer"].as_str().expect("answer 不是字符串");
    assert!(options.contains_key(answer));
}

#[tokio::test]
async fn test_generate_question_defaults_and_unknown_topic() {
    let (server, _dir) = test_server();

    // 空請求體：全部取默認值
    let response = server.post("/generate-question").json(&json!({})).await;
    response.assert_status_ok();

    // 未收錄主題解析到默認主題，仍能出題
    let response = server
        .post("/generate-question")
        .json(&json!({"topic": "不存在的主題"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["options"].as_object().is_some());
}

#[tokio::test]
async fn test_generate_question_randomness_not_degenerate() {
    let (server, _dir) = test_server();

    let mut seen = HashSet::new();
    for _ in 0..60 {
        let response = server
            .post("/generate-question")
            .json(&json!({"topic": "HKDSE 代數"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        seen.insert(body["question"].as_str().unwrap_or_default().to_string());
    }

    // 默認主題共 6 道固定題目，多次請求必須出現不止一道
    assert!(seen.len() > 1, "60 次請求只出現了一道題");
    assert!(seen.len() <= 6);
}

#[tokio::test]
async fn test_submit_answer_round_trip() {
    let (server, _dir) = test_server();

    let question: Value = server
        .post("/generate-question")
        .json(&json!({"topic": "HKDSE 代數"}))
        .await
        .json();
    let answer = question["answer"].as_str().expect("題目缺少答案").to_string();

    // 小寫作答也算對
    let response = server
        .post("/submit-answer")
        .json(&json!({
            "question": question,
            "studentAnswer": answer.to_lowercase(),
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["isCorrect"], true);
    assert_eq!(body["score"], 100);
    assert_eq!(body["totalScore"], 100);
}

#[tokio::test]
async fn test_submit_answer_wrong_key() {
    let (server, _dir) = test_server();

    let question: Value = server
        .post("/generate-question")
        .json(&json!({"topic": "HKDSE 代數"}))
        .await
        .json();
    let answer = question["answer"].as_str().expect("題目缺少答案");
    let wrong = ["A", "B", "C", "D"]
        .into_iter()
        .find(|k| *k != answer)
        .expect("找不到錯誤選項");

    let response = server
        .post("/submit-answer")
        .json(&json!({
            "question": question,
            "studentAnswer": wrong,
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["isCorrect"], false);
    assert_eq!(body["score"], 0);
    assert!(body["feedback"]
        .as_str()
        .unwrap_or_default()
        .contains(answer));
}

#[tokio::test]
async fn test_grade_without_image_returns_400_and_no_leftover_files() {
    let (server, dir) = test_server();

    // 有表單但沒有圖片字段
    let response = server
        .post("/grade-handwritten-answer")
        .multipart(MultipartForm::new().add_text("question", "x^2-5x+6=0"))
        .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"], "請上傳圖片");

    // 校驗失敗不應留下任何臨時文件
    let leftover: Vec<_> = std::fs::read_dir(dir.path())
        .map(|entries| entries.collect())
        .unwrap_or_default();
    assert!(leftover.is_empty(), "上傳目錄殘留了臨時文件");
}

#[tokio::test]
async fn test_grade_with_empty_image_returns_400() {
    let (server, _dir) = test_server();

    let part = Part::bytes(Vec::new())
        .file_name("answer.jpg")
        .mime_type("image/jpeg");
    let response = server
        .post("/grade-handwritten-answer")
        .multipart(MultipartForm::new().add_part("answerImage", part))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_parse_marking_scheme_stub() {
    let (server, _dir) = test_server();

    let part = Part::bytes(b"%PDF-1.4 fake".to_vec())
        .file_name("scheme.pdf")
        .mime_type("application/pdf");
    let response = server
        .post("/parse-marking-scheme")
        .multipart(MultipartForm::new().add_part("pdfFile", part))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["markingText"]
        .as_str()
        .unwrap_or_default()
        .contains("Model Answer"));
    assert_eq!(body["totalPages"], 1);
    assert!(body["extractedAnswers"].as_array().is_some());
}

#[tokio::test]
async fn test_parse_marking_scheme_without_file_returns_400() {
    let (server, _dir) = test_server();

    let response = server
        .post("/parse-marking-scheme")
        .multipart(MultipartForm::new().add_text("note", "沒有文件"))
        .await;
    response.assert_status_bad_request();
}
