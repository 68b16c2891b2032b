pub mod client;
pub mod service;
mod wire;

pub use client::{GeminiClient, GenerativeModel, ModelRequest, ModelResponse, ResponsePart};
pub use service::SmileService;
