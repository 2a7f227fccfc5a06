//! Shows how tests substitute deterministic replies for network calls.

use genwire::{GenerationRequest, GenerativeProvider, MockProvider, MockReply};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::new();

    // Concrete fallback plus a predicate for weather questions
    provider.expect_content("I can only answer weather questions.");
    provider.expect_callback(|contents| {
        contents
            .iter()
            .any(|c| c.text().contains("weather"))
            .then(|| MockReply::from("Sunny, 21°C."))
    });

    for prompt in ["What's the weather in Oslo?", "Write me a poem."] {
        let request = GenerationRequest::new("gemini-1.5-flash").with_user(prompt);
        let candidates = provider.generate_stream(&request).await?.candidates().await?;
        println!("> {prompt}");
        println!("{}", candidates.first_text().unwrap_or_default());
    }

    Ok(())
}
