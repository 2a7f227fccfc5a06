//! Minimal example showing the simplest usage of the library.

use futures_util::StreamExt;
use genwire::{GeminiProvider, GenerationConfig, GenerationRequest, GenerativeProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load API key from environment
    dotenvy::dotenv().ok();
    let provider = GeminiProvider::from_env()?;

    let request = GenerationRequest::new("gemini-1.5-flash")
        .with_user("What is the capital of France?")
        .with_config(GenerationConfig {
            temperature: Some(0.7),
            max_output_tokens: Some(100),
            ..Default::default()
        });

    // Print deltas as they arrive
    let response = provider.generate_stream(&request).await?;
    let mut chunks = Box::pin(response.read_stream());
    while let Some(chunk) = chunks.next().await {
        for candidate in &chunk?.candidates {
            print!("{}", candidate.text());
        }
    }
    println!();

    Ok(())
}
