pub mod toml_loader;

pub use toml_loader::{load_bank_file, BankFile, TopicEntry};
