/*!
 * Mock providers for testing the pipeline without network access.
 *
 * The translation mock passes text through unchanged unless an explicit
 * mapping is registered, which keeps end-to-end tests deterministic
 * while still exercising every fallback branch via the failing variants.
 */

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::ProviderError;
use crate::language::LanguageCode;

use super::{AnswerProvider, GenerationRequest, TranslationProvider};

/// Scriptable translation mock
#[derive(Debug, Default)]
pub struct MockTranslation {
    /// Explicit (text, target) -> translation mappings
    mappings: HashMap<(String, LanguageCode), String>,
    /// When set, every call fails
    fail: bool,
    /// Recorded calls as (text, source, target)
    calls: Mutex<Vec<(String, LanguageCode, LanguageCode)>>,
}

impl MockTranslation {
    /// Create a passthrough mock: every translation returns the input
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock where every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Register an explicit translation for (text, target)
    pub fn with_mapping(
        mut self,
        text: impl Into<String>,
        target: LanguageCode,
        translated: impl Into<String>,
    ) -> Self {
        self.mappings
            .insert((text.into(), target), translated.into());
        self
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Recorded calls as (text, source, target)
    pub fn calls(&self) -> Vec<(String, LanguageCode, LanguageCode)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TranslationProvider for MockTranslation {
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> Result<String, ProviderError> {
        self.calls.lock().push((text.to_string(), source, target));

        if self.fail {
            return Err(ProviderError::RequestFailed(
                "mock translation failure".to_string(),
            ));
        }

        if let Some(translated) = self.mappings.get(&(text.to_string(), target)) {
            return Ok(translated.clone());
        }

        Ok(text.to_string())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        if self.fail {
            return Err(ProviderError::ConnectionError(
                "mock connection failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scriptable answer-generation mock
#[derive(Debug, Default)]
pub struct MockAnswer {
    /// Queue of canned answers; the last one repeats
    answers: Mutex<VecDeque<String>>,
    /// When set, every call fails
    fail: bool,
    /// Recorded generation requests
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockAnswer {
    /// Create a mock that always returns `answer`
    pub fn with_answer(answer: impl Into<String>) -> Self {
        Self::with_answers(vec![answer.into()])
    }

    /// Create a mock that returns the given answers in order, repeating
    /// the last one
    pub fn with_answers(answers: Vec<String>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    /// Create a mock where every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Recorded generation requests
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl AnswerProvider for MockAnswer {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request);

        if self.fail {
            return Err(ProviderError::RequestFailed(
                "mock generation failure".to_string(),
            ));
        }

        let mut answers = self.answers.lock();
        match answers.len() {
            0 => Err(ProviderError::RequestFailed(
                "mock has no scripted answers".to_string(),
            )),
            1 => Ok(answers[0].clone()),
            _ => Ok(answers.pop_front().expect("queue checked non-empty")),
        }
    }
}
