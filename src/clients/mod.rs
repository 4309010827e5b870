pub mod llm_client;

pub use llm_client::{extract_json_object, LlmClient, TextGenerator};
