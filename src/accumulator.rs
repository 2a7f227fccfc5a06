//! Aggregation of streamed chunks into a final candidate set.

use ijson::IValue;

use crate::types::{Candidate, Candidates, GenerationChunk, Part};

/// Accumulates [`GenerationChunk`]s into a complete [`Candidates`] value.
///
/// Candidates are matched by position across chunks (provider ranking order,
/// which is preserved as-is). Within a candidate, consecutive text deltas are
/// concatenated; finish reason and metadata take the last chunk's value.
#[derive(Debug, Default)]
pub struct CandidatesAccumulator {
    slots: Vec<Candidate>,
    usage_metadata: Option<IValue>,
}

impl CandidatesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the accumulated state.
    pub fn push_chunk(&mut self, chunk: GenerationChunk) {
        if chunk.usage_metadata.is_some() {
            self.usage_metadata = chunk.usage_metadata;
        }

        for (idx, incoming) in chunk.candidates.into_iter().enumerate() {
            if idx >= self.slots.len() {
                self.slots.push(incoming);
            } else {
                merge_candidate(&mut self.slots[idx], incoming);
            }
        }
    }

    /// Usage metadata from the most recent chunk that carried any.
    pub fn usage_metadata(&self) -> Option<&IValue> {
        self.usage_metadata.as_ref()
    }

    /// The aggregated candidate set, in provider order.
    pub fn finalize(self) -> Candidates {
        Candidates::new(self.slots)
    }
}

fn merge_candidate(existing: &mut Candidate, incoming: Candidate) {
    if let Some(content) = incoming.content {
        match existing.content.as_mut() {
            Some(accumulated) => {
                let (_, parts) = content.into_parts();
                for part in parts {
                    append_part(accumulated.parts_mut(), part);
                }
            }
            None => existing.content = Some(content),
        }
    }

    if incoming.finish_reason.is_some() {
        existing.finish_reason = incoming.finish_reason;
    }

    for (key, value) in incoming.extra {
        existing.extra.insert(key, value);
    }
}

/// Append a streamed part, concatenating adjacent text deltas.
fn append_part(parts: &mut Vec<Part>, incoming: Part) {
    if let (Some(Part::Text(last)), Part::Text(delta)) = (parts.last_mut(), &incoming) {
        last.text.push_str(&delta.text);
        for (key, value) in delta.extra.clone() {
            last.extra.insert(key, value);
        }
        return;
    }
    parts.push(incoming);
}
