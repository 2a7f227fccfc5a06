//! Deterministic mock dispatch for simulating provider behavior in tests.
//!
//! Tests register expected replies (literal strings, full [`Content`] or
//! [`Candidates`] values, or predicate callbacks) and the mock provider
//! resolves them against each incoming request instead of performing network
//! I/O. Registration state is per-instance and never leaks between test
//! scenarios.

use std::sync::Mutex;

use bytes::Bytes;

use crate::provider::GenerativeProvider;
use crate::types::{Candidates, Content, GenerationChunk, GenerationRequest};
use crate::{Error, StreamResponse};

/// A concrete mock reply. Strings and Contents normalize to a
/// single-candidate [`Candidates`] so resolution has one return contract.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Content(Content),
    Candidates(Candidates),
}

impl MockReply {
    fn into_candidates(self) -> Candidates {
        match self {
            MockReply::Text(text) => Candidates::from_text(text),
            MockReply::Content(content) => Candidates::from_content(content),
            MockReply::Candidates(candidates) => candidates,
        }
    }
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        MockReply::Text(text)
    }
}

impl From<Content> for MockReply {
    fn from(content: Content) -> Self {
        MockReply::Content(content)
    }
}

impl From<Candidates> for MockReply {
    fn from(candidates: Candidates) -> Self {
        MockReply::Candidates(candidates)
    }
}

type MockCallback = Box<dyn Fn(&[Content]) -> Option<MockReply> + Send + Sync>;

/// Registers expected replies and resolves them against incoming requests.
///
/// Precedence: callbacks run first, in registration order, each seeing the
/// request's full content list; the first to return a reply wins. When no
/// callback answers, the most recently registered concrete reply is the
/// fallback. With neither, resolution fails — an unconfigured mock is a test
/// bug, not a default.
#[derive(Default)]
pub struct MockDispatcher {
    callbacks: Vec<MockCallback>,
    fallback: Option<MockReply>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete reply. Later registrations replace earlier ones
    /// in the fallback slot.
    pub fn expect_content(&mut self, reply: impl Into<MockReply>) {
        self.fallback = Some(reply.into());
    }

    /// Register a predicate callback. Callbacks accumulate and are tried in
    /// registration order.
    pub fn expect_callback<F>(&mut self, callback: F)
    where
        F: Fn(&[Content]) -> Option<MockReply> + Send + Sync + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Drop all registrations.
    pub fn clear(&mut self) {
        self.callbacks.clear();
        self.fallback = None;
    }

    /// Resolve a pending request against the registered expectations.
    pub fn resolve(&self, contents: &[Content]) -> Result<Candidates, Error> {
        for callback in &self.callbacks {
            if let Some(reply) = callback(contents) {
                return Ok(reply.into_candidates());
            }
        }
        if let Some(reply) = self.fallback.clone() {
            return Ok(reply.into_candidates());
        }
        Err(Error::MockUnconfigured)
    }
}

/// A [`GenerativeProvider`] that answers from a [`MockDispatcher`].
///
/// Resolved candidates are encoded as a one-chunk body and fed through the
/// real [`StreamResponse`] pipeline, so consumers exercise the same decode
/// path as against a live backend.
#[derive(Default)]
pub struct MockProvider {
    dispatcher: Mutex<MockDispatcher>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concrete reply.
    pub fn expect_content(&self, reply: impl Into<MockReply>) {
        self.dispatcher.lock().unwrap().expect_content(reply);
    }

    /// Register a predicate callback.
    pub fn expect_callback<F>(&self, callback: F)
    where
        F: Fn(&[Content]) -> Option<MockReply> + Send + Sync + 'static,
    {
        self.dispatcher.lock().unwrap().expect_callback(callback);
    }

    /// Drop all registrations.
    pub fn clear_expectations(&self) {
        self.dispatcher.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for MockProvider {
    async fn generate_stream(&self, request: &GenerationRequest) -> Result<StreamResponse, Error> {
        let candidates = self.dispatcher.lock().unwrap().resolve(&request.contents)?;
        let chunk = GenerationChunk::from_candidates(candidates);
        let body = serde_json::to_vec(&[chunk])?;
        Ok(StreamResponse::from_body(Bytes::from(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(text: &str) -> Vec<Content> {
        vec![Content::user(text)]
    }

    #[test]
    fn test_concrete_reply_resolves() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_content("A");

        let candidates = dispatcher.resolve(&request_with("anything")).unwrap();
        assert_eq!(candidates.first_text().as_deref(), Some("A"));
    }

    #[test]
    fn test_null_callback_falls_back_to_concrete() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_content("A");
        dispatcher.expect_callback(|_| None);

        let candidates = dispatcher.resolve(&request_with("anything")).unwrap();
        assert_eq!(candidates.first_text().as_deref(), Some("A"));
    }

    #[test]
    fn test_matching_callback_beats_concrete() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_content("A");
        dispatcher.expect_callback(|contents| {
            contents
                .iter()
                .any(|c| c.text().contains("weather"))
                .then(|| MockReply::from("B"))
        });

        let with = dispatcher
            .resolve(&request_with("what is the weather like?"))
            .unwrap();
        assert_eq!(with.first_text().as_deref(), Some("B"));

        let without = dispatcher.resolve(&request_with("tell me a joke")).unwrap();
        assert_eq!(without.first_text().as_deref(), Some("A"));
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_callback(|_| Some(MockReply::from("first")));
        dispatcher.expect_callback(|_| Some(MockReply::from("second")));

        let candidates = dispatcher.resolve(&request_with("x")).unwrap();
        assert_eq!(candidates.first_text().as_deref(), Some("first"));
    }

    #[test]
    fn test_most_recent_concrete_wins() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_content("older");
        dispatcher.expect_content("newer");

        let candidates = dispatcher.resolve(&request_with("x")).unwrap();
        assert_eq!(candidates.first_text().as_deref(), Some("newer"));
    }

    #[test]
    fn test_unconfigured_mock_is_fatal() {
        let dispatcher = MockDispatcher::new();
        assert!(matches!(
            dispatcher.resolve(&request_with("x")),
            Err(Error::MockUnconfigured)
        ));

        let mut cleared = MockDispatcher::new();
        cleared.expect_content("A");
        cleared.clear();
        assert!(matches!(
            cleared.resolve(&request_with("x")),
            Err(Error::MockUnconfigured)
        ));
    }

    #[test]
    fn test_replies_normalize_to_single_candidate() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_content(Content::model("structured reply"));
        let candidates = dispatcher.resolve(&request_with("x")).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates.first_text().as_deref(), Some("structured reply"));

        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_content(Candidates::new(vec![
            crate::types::Candidate::from_content(Content::model("ranked 1")),
            crate::types::Candidate::from_content(Content::model("ranked 2")),
        ]));
        let candidates = dispatcher.resolve(&request_with("x")).unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_callback_sees_full_content_list() {
        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_callback(|contents| {
            assert_eq!(contents.len(), 2);
            Some(MockReply::from(format!("saw {} turns", contents.len())))
        });

        let contents = vec![Content::user("first"), Content::model("second")];
        let candidates = dispatcher.resolve(&contents).unwrap();
        assert_eq!(candidates.first_text().as_deref(), Some("saw 2 turns"));
    }

    #[test]
    fn test_dispatchers_are_isolated() {
        let mut a = MockDispatcher::new();
        let b = MockDispatcher::new();
        a.expect_content("only in a");

        assert!(a.resolve(&request_with("x")).is_ok());
        assert!(matches!(
            b.resolve(&request_with("x")),
            Err(Error::MockUnconfigured)
        ));
    }
}
