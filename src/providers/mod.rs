/*!
 * Clients for the external capabilities the pipeline consumes.
 *
 * The pipeline treats translation and answer generation as external
 * collaborators behind small async traits:
 * - `TranslationProvider`: converts text between supported languages
 * - `AnswerProvider`: produces a candidate answer for a farmer's question
 *
 * Both may fail; failure handling (fallback phrases, passthrough,
 * localized apologies) lives in the components that consume them, never
 * in the clients themselves.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::conversation::Exchange;
use crate::errors::ProviderError;
use crate::language::LanguageCode;

/// Common trait for translation capabilities
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate `text` from `source` to `target`
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source` - Language of the input text
    /// * `target` - Language to translate into
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source: LanguageCode,
        target: LanguageCode,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// A request for the answer-generation capability
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The farmer's question, already in the working language
    pub message: String,
    /// The language the farmer wrote in
    pub language: LanguageCode,
    /// Display name used to personalize the answer
    pub farmer_name: String,
    /// Recent conversation history, oldest first
    pub history: Vec<Exchange>,
}

/// Common trait for answer-generation capabilities
#[async_trait]
pub trait AnswerProvider: Send + Sync + Debug {
    /// Generate a candidate answer for the request
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The raw candidate answer or an error
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}

pub mod http;
pub mod mock;
