/*!
 * End-to-end message pipeline.
 *
 * `process_message` is the single entry point: it takes a raw farmer
 * message and always produces a deliverable response string. Every
 * internal failure degrades to something safe, never to an error the
 * messaging layer would have to handle: provider failures become
 * apologies, validation failures become fallback sentences, and store
 * write failures are logged without losing the response.
 */

use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};

use crate::conversation::{ConversationStore, Exchange};
use crate::detection::LanguageDetector;
use crate::language::LanguageCode;
use crate::normalize::TextNormalizer;
use crate::providers::{AnswerProvider, GenerationRequest, TranslationProvider};
use crate::translation::Translator;
use crate::validation::ResponseValidator;

/// Working-language fallback substituted at the English checkpoint
const SAFE_ENGLISH_FALLBACK: &str = "I can help you with farming questions, market prices, and \
     crop advice. Please let me know what specific information you need.";

/// Working-language apology used when answer generation fails
const APOLOGY_EN: &str =
    "Sorry, I'm having trouble responding right now. Please try again later.";

/// Hardcoded default-language apology, the last resort when the
/// translation provider is down as well
const DEFAULT_APOLOGY: &str =
    "क्षमा करें, मुझे अभी जवाब देने में परेशानी हो रही है। कृपया थोड़ी देर बाद फिर से कोशिश करें।";

/// Pre-vetted fallback sentence for each supported language. Every
/// sentence passes the validator's own checks for its language.
pub fn fallback_sentence(language: LanguageCode) -> &'static str {
    match language {
        LanguageCode::Hi => {
            "मैं आपके खेती के सवाल, बाजार के भाव और फसल की सलाह में मदद कर सकता हूं। कृपया बताएं कि आपको क्या जानकारी चाहिए।"
        }
        LanguageCode::Bn => {
            "আমি আপনার কৃষি প্রশ্ন, বাজার দাম এবং ফসলের পরামর্শে সাহায্য করতে পারি। অনুগ্রহ করে বলুন আপনার কী তথ্য প্রয়োজন।"
        }
        LanguageCode::Ta => {
            "நான் உங்கள் விவசாய கேள்விகள், சந்தை விலைகள் மற்றும் பயிர் ஆலோசனைகளில் உதவ முடியும். என்ன தகவல் தேவை என்று சொல்லுங்கள்।"
        }
        LanguageCode::Te => {
            "నేను మీ వ్యవసాయ ప్రశ్నలు, మార్కెట్ ధరలు మరియు పంట సలహాలలో సహాయం చేయగలను. మీకు ఏ సమాచారం కావాలో చెప్పండి।"
        }
        LanguageCode::Kn => {
            "ನಾನು ನಿಮ್ಮ ಕೃಷಿ ಪ್ರಶ್ನೆಗಳು, ಮಾರುಕಟ್ಟೆ ಬೆಲೆಗಳು ಮತ್ತು ಬೆಳೆ ಸಲಹೆಗಳಲ್ಲಿ ಸಹಾಯ ಮಾಡಬಹುದು. ನಿಮಗೆ ಯಾವ ಮಾಹಿತಿ ಬೇಕು ಎಂದು ತಿಳಿಸಿ।"
        }
        LanguageCode::Gu => {
            "હું તમારા ખેતીના પ્રશ્નો, બજારના ભાવ અને પાકની સલાહમાં મદદ કરી શકું છું. કૃપા કરીને કહો કે તમને કઈ માહિતી જોઈએ છે।"
        }
        LanguageCode::Ml => {
            "എനിക്ക് നിങ്ങളുടെ കൃഷി ചോദ്യങ്ങൾ, മാർക്കറ്റ് വിലകൾ, വിള ഉപദേശങ്ങൾ എന്നിവയിൽ സഹായിക്കാം. എന്ത് വിവരമാണ് വേണ്ടതെന്ന് പറയൂ।"
        }
        LanguageCode::Pa => {
            "ਮੈਂ ਤੁਹਾਡੇ ਖੇਤੀ ਦੇ ਸਵਾਲਾਂ, ਮਾਰਕਿਟ ਦੇ ਭਾਅ ਅਤੇ ਫਸਲ ਦੀ ਸਲਾਹ ਵਿੱਚ ਮਦਦ ਕਰ ਸਕਦਾ ਹਾਂ। ਕਿਰਪਾ ਕਰਕੇ ਦੱਸੋ ਕਿ ਤੁਹਾਨੂੰ ਕੀ ਜਾਣਕਾਰੀ ਚਾਹੀਦੀ ਹੈ।"
        }
        LanguageCode::Mr => {
            "मी तुमच्या शेतीविषयक प्रश्न, बाजारभाव आणि पीक सल्ल्यामध्ये मदत करू शकतो. कृपया सांगा तुम्हाला कोणती माहिती हवी आहे."
        }
        LanguageCode::Or => {
            "ମୁଁ ଆପଣଙ୍କ ଚାଷ ପ୍ରଶ୍ନ, ବଜାର ଦର ଏବଂ ଫସଲ ପରାମର୍ଶରେ ସାହାଯ୍ୟ କରିପାରିବି। ଦୟାକରି କୁହନ୍ତୁ ଆପଣଙ୍କୁ କେଉଁ ସୂଚନା ଦରକାର।"
        }
        LanguageCode::As => {
            "মই আপোনাৰ খেতিৰ প্ৰশ্ন, বজাৰ দৰ আৰু শস্যৰ পৰামৰ্শত সহায় কৰিব পাৰোঁ। অনুগ্ৰহ কৰি কওক আপোনাক কি তথ্য লাগে।"
        }
        LanguageCode::En => SAFE_ENGLISH_FALLBACK,
    }
}

/// The full pipeline wired together.
#[derive(Debug)]
pub struct PipelineOrchestrator {
    detector: LanguageDetector,
    normalizer: TextNormalizer,
    translator: Translator,
    validator: ResponseValidator,
    answers: Arc<dyn AnswerProvider>,
    store: Arc<dyn ConversationStore>,
}

impl PipelineOrchestrator {
    /// Wire a pipeline with default normalizer and validator thresholds
    pub fn new(
        translation: Arc<dyn TranslationProvider>,
        answers: Arc<dyn AnswerProvider>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self::with_components(
            TextNormalizer::new(),
            ResponseValidator::new(),
            translation,
            answers,
            store,
        )
    }

    /// Wire a pipeline with explicit normalizer and validator
    pub fn with_components(
        normalizer: TextNormalizer,
        validator: ResponseValidator,
        translation: Arc<dyn TranslationProvider>,
        answers: Arc<dyn AnswerProvider>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            detector: LanguageDetector::new(),
            normalizer,
            translator: Translator::new(translation),
            validator,
            answers,
            store,
        }
    }

    /// Process one farmer message into a deliverable response. Never fails.
    pub async fn process_message(&self, user_id: &str, farmer_name: &str, message: &str) -> String {
        match self.run(user_id, farmer_name, message).await {
            Ok(response) => response,
            Err(e) => {
                error!("Pipeline failed for {}: {}", user_id, e);
                let language = self.detector.detect(message).language;
                self.apologize(language).await
            }
        }
    }

    /// Localized apology, translated best-effort. When the translation
    /// provider is down too, falls back to the hardcoded default-language
    /// apology rather than delivering untranslated English.
    async fn apologize(&self, language: LanguageCode) -> String {
        match self.translator.try_from_working(APOLOGY_EN, language).await {
            Ok(apology) => apology,
            Err(e) => {
                warn!(
                    "Could not translate apology to {} ({}), using default-language apology",
                    language, e
                );
                DEFAULT_APOLOGY.to_string()
            }
        }
    }

    async fn run(&self, user_id: &str, farmer_name: &str, message: &str) -> Result<String> {
        let detection = self.detector.detect(message);
        let language = detection.language;
        info!(
            "Processing message from {} (detected {} via {})",
            farmer_name,
            language,
            detection.source.as_str()
        );

        // Bare greetings are answered from a template before normalization,
        // which would otherwise reduce a one-word greeting to nothing
        if self.translator.canonical_greeting(message).is_some() {
            let greeting = format!(
                "Hello {}! 🙏\nI am KisanVaani, your WhatsApp farming assistant. I can help you \
                 with market prices, crop advice, and more. How can I assist you today?",
                farmer_name
            );
            let response = self.translator.from_working(&greeting, language).await;
            self.persist(user_id, message, &response, language).await;
            return Ok(response);
        }

        let cleaned = self.normalizer.clean(message);
        let working_message = if cleaned.is_empty() {
            // Nothing survived normalization; salvage a topic so answer
            // generation still has a question to work with
            self.translator.salvage_topic(message).to_string()
        } else {
            self.translator.to_working(&cleaned, language).await
        };

        let history = self.store.get(user_id).await?;

        let candidate = match self
            .answers
            .generate(GenerationRequest {
                message: working_message,
                language,
                farmer_name: farmer_name.to_string(),
                history,
            })
            .await
        {
            Ok(candidate) => candidate,
            Err(e) => {
                error!("Answer generation failed for {}: {}", user_id, e);
                return Ok(self.apologize(language).await);
            }
        };

        let candidate_language = self.detector.detect(&candidate).language;
        let translated = if candidate_language == language {
            // Already in the farmer's language, deliver directly
            candidate
        } else {
            let english = if candidate_language == self.translator.working() {
                candidate
            } else {
                self.translator
                    .to_working(&candidate, candidate_language)
                    .await
            };

            let verdict = self.validator.validate(&english, LanguageCode::En);
            let english = if verdict.accepted {
                english
            } else {
                warn!(
                    "Working-language response rejected ({}), substituting safe fallback",
                    verdict.reason
                );
                SAFE_ENGLISH_FALLBACK.to_string()
            };

            self.translator.from_working(&english, language).await
        };

        // Final gate: whatever reaches the farmer must pass validation in
        // their language
        let verdict = self.validator.validate(&translated, language);
        let response = if verdict.accepted {
            translated
        } else {
            warn!(
                "Final response rejected for {} ({}), substituting {} fallback",
                user_id, verdict.reason, language
            );
            fallback_sentence(language).to_string()
        };

        self.persist(user_id, message, &response, language).await;
        Ok(response)
    }

    /// Append the exchange, logging but not propagating store failures:
    /// the farmer still gets their response
    async fn persist(&self, user_id: &str, message: &str, response: &str, language: LanguageCode) {
        let exchange = Exchange::new(message, response, language);
        if let Err(e) = self.store.append_exchange(user_id, exchange).await {
            error!("Failed to persist exchange for {}: {}", user_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::SqliteConversationStore;
    use crate::providers::mock::{MockAnswer, MockTranslation};
    use crate::validation::ResponseValidator;

    #[test]
    fn test_fallbackSentences_shouldPassOwnValidation() {
        let validator = ResponseValidator::new();

        for language in LanguageCode::ALL {
            let verdict = validator.validate(fallback_sentence(language), language);
            assert!(
                verdict.accepted,
                "fallback for {} rejected: {}",
                language, verdict.reason
            );
        }
    }

    #[test]
    fn test_safeEnglishFallback_shouldPassEnglishValidation() {
        let validator = ResponseValidator::new();

        let verdict = validator.validate(SAFE_ENGLISH_FALLBACK, LanguageCode::En);

        assert!(verdict.accepted);
    }

    #[tokio::test]
    async fn test_processMessage_withAllProvidersDown_shouldUseDefaultApology() {
        let pipeline = PipelineOrchestrator::new(
            Arc::new(MockTranslation::failing()),
            Arc::new(MockAnswer::failing()),
            Arc::new(SqliteConversationStore::new_in_memory().unwrap()),
        );

        let response = pipeline
            .process_message("farmer-1", "Ravi", "गेहूं का भाव क्या है")
            .await;

        // Translation is down too, so the apology cannot be localized
        // best-effort and the hardcoded default-language one is delivered
        assert_eq!(response, DEFAULT_APOLOGY);
    }

    #[tokio::test]
    async fn test_processMessage_withFailingGeneratorAndEnglishUser_shouldApologizeInEnglish() {
        let pipeline = PipelineOrchestrator::new(
            Arc::new(MockTranslation::failing()),
            Arc::new(MockAnswer::failing()),
            Arc::new(SqliteConversationStore::new_in_memory().unwrap()),
        );

        let response = pipeline
            .process_message(
                "farmer-1",
                "Ravi",
                "Could you tell me how to improve the irrigation schedule for my vegetable patch?",
            )
            .await;

        // Working-language users never need the translation provider for
        // the apology
        assert_eq!(response, APOLOGY_EN);
    }
}
