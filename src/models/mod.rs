pub mod loaders;
pub mod question;

pub use loaders::load_bank_file;
pub use question::{DifficultyTier, Question};
