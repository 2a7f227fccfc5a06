use ijson::IValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::Content;
use super::enums::{FinishReason, WireEnum};

/// One candidate completion returned by a provider.
///
/// Everything beyond the content itself (finish reason, safety ratings,
/// grounding and citation metadata) is provider metadata this layer stores
/// and forwards verbatim, never interprets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Raw provider finish reason, preserved verbatim. Typed access via
    /// [`Candidate::finish`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// A candidate wrapping the given content, no metadata.
    pub fn from_content(content: Content) -> Self {
        Self {
            content: Some(content),
            finish_reason: None,
            extra: Map::new(),
        }
    }

    /// The finish reason parsed against the closed [`FinishReason`] set.
    ///
    /// `None` when absent or not a declared member; the raw string stays
    /// available in `finish_reason` either way.
    pub fn finish(&self) -> Option<FinishReason> {
        self.finish_reason
            .as_deref()
            .and_then(<FinishReason as WireEnum>::parse)
    }

    /// All text parts of this candidate concatenated in order.
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(Content::text)
            .unwrap_or_default()
    }
}

/// The ranked alternative completions for one request.
///
/// Order reflects provider ranking and is never changed by this layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Candidates {
    entries: Vec<Candidate>,
}

impl Candidates {
    pub fn new(entries: Vec<Candidate>) -> Self {
        Self { entries }
    }

    /// A single-candidate set wrapping one content turn.
    pub fn from_content(content: Content) -> Self {
        Self {
            entries: vec![Candidate::from_content(content)],
        }
    }

    /// A single-candidate set wrapping one model text turn.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_content(Content::model(text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.entries.iter()
    }

    /// Text of the top-ranked candidate, if there is one.
    pub fn first_text(&self) -> Option<String> {
        self.entries.first().map(Candidate::text)
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.entries
    }
}

impl From<Vec<Candidate>> for Candidates {
    fn from(entries: Vec<Candidate>) -> Self {
        Self::new(entries)
    }
}

impl IntoIterator for Candidates {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Candidates {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One decoded unit of a streamed generation response.
///
/// Unknown top-level keys (model version, response id, timestamps, ...) are
/// passed through untouched in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationChunk {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<IValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationChunk {
    /// A chunk carrying the given candidates and nothing else. Used by the
    /// mock path to synthesize provider output.
    pub fn from_candidates(candidates: Candidates) -> Self {
        Self {
            candidates: candidates.into_vec(),
            usage_metadata: None,
            extra: Map::new(),
        }
    }
}
