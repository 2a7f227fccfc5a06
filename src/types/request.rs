use serde::{Deserialize, Serialize};

use super::content::Content;
use super::tools::Tool;

/// Sampling and output controls for a generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,
}

/// A fully-formed content-generation request.
///
/// `model` selects the endpoint and never serializes into the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

impl GenerationRequest {
    /// A request against `model` with no contents yet.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: Vec::new(),
            tools: None,
            generation_config: None,
            system_instruction: None,
        }
    }

    /// Append a user text turn.
    pub fn with_user(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::user(text));
        self
    }

    /// Append a model text turn.
    pub fn with_model(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::model(text));
        self
    }

    /// Append an arbitrary content turn.
    pub fn with_content(mut self, content: Content) -> Self {
        self.contents.push(content);
        self
    }

    /// Attach a tool.
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    /// Set the generation config.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Set the system instruction.
    pub fn with_system_instruction(mut self, content: Content) -> Self {
        self.system_instruction = Some(content);
        self
    }
}
