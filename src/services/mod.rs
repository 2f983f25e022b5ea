pub mod generation_service;
pub mod grading_service;
pub mod llm_service;
pub mod question_bank;
pub mod scoring_service;

pub use generation_service::GenerationService;
pub use grading_service::{GradingResult, GradingService, GRADING_CONFIDENCE};
pub use llm_service::{ChatOptions, LlmService};
pub use question_bank::{QuestionBank, DEFAULT_TOPIC};
pub use scoring_service::{score, ScoreOutcome};
