pub mod config;
pub mod extraction;
pub mod llm;
pub mod request_log;
pub mod uploads;
