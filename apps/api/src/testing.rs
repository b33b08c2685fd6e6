//! Test doubles shared across module tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::llm_client::{LlmError, TextGenerator};
use crate::models::internship::ResourceLink;
use crate::models::user::UserProfile;
use crate::resources::VideoSearch;

/// Ordered log of side effects shared between fakes.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: &str) {
        self.0.lock().unwrap().push(entry.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Replays canned generator results in order. Once exhausted, every call
/// fails with `EmptyContent`.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    journal: Journal,
}

impl ScriptedGenerator {
    pub fn with_responses(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with_responses(vec![Ok(text.to_string())])
    }

    pub fn failing(err: LlmError) -> Self {
        Self::with_responses(vec![Err(err)])
    }

    pub fn journaled(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.push("generate");
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Returns one deterministic link per term.
#[derive(Default)]
pub struct FixedVideoSearch {
    terms: Mutex<Vec<String>>,
}

impl FixedVideoSearch {
    pub fn terms(&self) -> Vec<String> {
        self.terms.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for FixedVideoSearch {
    async fn search(&self, term: &str) -> Vec<ResourceLink> {
        self.terms.lock().unwrap().push(term.to_string());
        vec![ResourceLink {
            title: format!("Video: {term}"),
            url: format!("https://videos.test/{}", term.replace(' ', "-")),
        }]
    }
}

pub fn sample_user(occupation: &str) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        email: "student@example.com".to_string(),
        occupation: occupation.to_string(),
        interests: vec!["distributed systems".to_string()],
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        experience_level: 2,
        city: String::new(),
        country: String::new(),
    }
}
