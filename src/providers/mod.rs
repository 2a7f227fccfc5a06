//! Provider bindings for concrete generative-AI backends.

pub mod gemini;

// Re-export commonly used provider types
pub use gemini::GeminiProvider;
