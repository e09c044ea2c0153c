/*!
 * Translation orchestration between farmer languages and the working
 * language.
 *
 * The translator never lets a provider failure surface to the caller:
 * inbound failures degrade to a salvaged topic phrase so answer
 * generation still has something to work with, and outbound failures
 * degrade to the untranslated working-language text, which is still a
 * correct answer even if it is in the wrong language.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::errors::ProviderError;
use crate::language::LanguageCode;
use crate::providers::TranslationProvider;

/// Greeting forms across the supported scripts, all canonicalized to
/// the same working-language greeting
const GREETING_FORMS: [&str; 16] = [
    "नमस्ते",
    "नमस्कार",
    "namaste",
    "namaskar",
    "hello",
    "hi",
    "hey",
    "নমস্কার",
    "নমস্কাৰ",
    "வணக்கம்",
    "నమస్కారం",
    "ನಮಸ್ಕಾರ",
    "નમસ્તે",
    "നമസ്കാരം",
    "ਨਮਸਤੇ",
    "ନମସ୍କାର",
];

/// Canonical working-language form every greeting maps to
const CANONICAL_GREETING: &str = "hello";

/// Topic keywords used to salvage a working-language phrase when inbound
/// translation fails. Scanned in order, first hit wins; the most specific
/// topics come first.
const TOPIC_SALVAGE: [(&[&str], &str); 3] = [
    (&["करेला", "karela", "bitter gourd"], "bitter gourd farming question"),
    (&["कीमत", "दाम", "भाव", "price", "cost"], "price question"),
    (&["मंडी", "बाजार", "market"], "market price question"),
];

/// Phrase used when inbound translation fails and no topic keyword matches
const GENERIC_SALVAGE: &str = "farming question";

/// Bidirectional translator pinned to a single working language.
#[derive(Debug, Clone)]
pub struct Translator {
    /// Provider performing the actual translations
    provider: Arc<dyn TranslationProvider>,
    /// The language answers are generated and validated in
    working: LanguageCode,
}

impl Translator {
    /// Create a translator using `provider`, working in English
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self::with_working(provider, LanguageCode::WORKING)
    }

    /// Create a translator with an explicit working language
    pub fn with_working(provider: Arc<dyn TranslationProvider>, working: LanguageCode) -> Self {
        Self { provider, working }
    }

    /// The working language this translator targets inbound
    pub fn working(&self) -> LanguageCode {
        self.working
    }

    /// Canonicalize a greeting-only message to the working-language
    /// greeting, or `None` if the message is not a bare greeting.
    ///
    /// Only messages that consist entirely of greeting forms qualify,
    /// so "namaste, what is the wheat price" is not canonicalized away.
    pub fn canonical_greeting(&self, text: &str) -> Option<&'static str> {
        let mut saw_any = false;
        for token in text.to_lowercase().split_whitespace() {
            let token = token.trim_matches(|c: char| c.is_ascii_punctuation() || c == '।');
            if token.is_empty() {
                continue;
            }
            if !GREETING_FORMS.contains(&token) {
                return None;
            }
            saw_any = true;
        }
        saw_any.then_some(CANONICAL_GREETING)
    }

    /// Translate a farmer message into the working language. Never fails.
    ///
    /// Empty input and working-language input pass through unchanged.
    /// On provider failure the message is replaced by a salvaged topic
    /// phrase so the rest of the pipeline still has usable input.
    pub async fn to_working(&self, text: &str, source: LanguageCode) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        if let Some(greeting) = self.canonical_greeting(text) {
            debug!("Canonicalized greeting to {:?}", greeting);
            return greeting.to_string();
        }

        if source == self.working {
            return text.to_string();
        }

        match self.provider.translate(text, source, self.working).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    "Inbound translation from {} failed ({}), salvaging topic",
                    source, e
                );
                self.salvage_topic(text).to_string()
            }
        }
    }

    /// Translate a working-language answer into the farmer's language.
    /// Never fails: on provider failure the working-language text passes
    /// through unchanged.
    pub async fn from_working(&self, text: &str, target: LanguageCode) -> String {
        match self.try_from_working(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    "Outbound translation to {} failed ({}), returning untranslated text",
                    target, e
                );
                text.to_string()
            }
        }
    }

    /// Translate a working-language answer into the farmer's language,
    /// surfacing provider failure to callers that have a better fallback
    /// than passthrough
    pub async fn try_from_working(
        &self,
        text: &str,
        target: LanguageCode,
    ) -> Result<String, ProviderError> {
        if text.trim().is_empty() || target == self.working {
            return Ok(text.to_string());
        }

        self.provider.translate(text, self.working, target).await
    }

    /// Recover a working-language topic phrase from an untranslatable
    /// message using keyword evidence
    pub fn salvage_topic(&self, text: &str) -> &'static str {
        let lower = text.to_lowercase();
        for (keywords, phrase) in TOPIC_SALVAGE {
            if keywords.iter().any(|k| lower.contains(k)) {
                return phrase;
            }
        }
        GENERIC_SALVAGE
    }
}
