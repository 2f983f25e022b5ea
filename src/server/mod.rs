//! HTTP 服務
//!
//! 路由、CORS 和啟動邏輯。業務都在 `services` 層，這裡只做組裝。

pub mod handlers;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

use crate::utils::logging;

/// 上傳圖片/PDF 的大小上限
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 組裝路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 只放行配置的前端地址；地址不合法就不加 origin 限制之外的額外來源
    let cors = match state.config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => CorsLayer::new(),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/generate-question", post(handlers::generate_question))
        .route("/submit-answer", post(handlers::submit_answer))
        .route(
            "/grade-handwritten-answer",
            post(handlers::grade_handwritten_answer),
        )
        .route("/parse-marking-scheme", post(handlers::parse_marking_scheme))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// 綁定端口並啟動服務
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("無法綁定地址: {}", addr))?;

    logging::log_startup(state.config.server_port, state.config.service_ready());

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP 服務異常退出")?;

    Ok(())
}
