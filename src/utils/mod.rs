pub mod json;
pub mod logging;

pub use json::clean_json;
