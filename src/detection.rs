/*!
 * Language detection for incoming messages.
 *
 * Detection is lexicon-first: short, code-mixed farmer messages defeat
 * generic statistical detectors, so curated lists of greetings, farming
 * vocabulary and commodity names per language take precedence. Only when
 * no lexicon entry matches does the statistical detector run, and its
 * output is always coerced into the supported language set.
 */

use log::{debug, info, warn};

use crate::language::LanguageCode;
use crate::script::contains_devanagari;

/// How a detection result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// A curated lexicon entry matched
    PatternMatch,
    /// The statistical detector produced the result (including results
    /// coerced into the supported set)
    Statistical,
    /// A known statistical misdetection was corrected using character-set
    /// or keyword evidence
    Corrected,
    /// The detector had nothing to go on (empty input or no statistical
    /// result)
    DefaultFallback,
}

impl DetectionSource {
    /// Short identifier for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatternMatch => "pattern-match",
            Self::Statistical => "statistical",
            Self::Corrected => "corrected",
            Self::DefaultFallback => "default-fallback",
        }
    }
}

/// Result of language detection. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    /// The text that was classified
    pub text: String,
    /// The detected language, always in the supported set
    pub language: LanguageCode,
    /// How the result was produced
    pub source: DetectionSource,
}

impl DetectionResult {
    fn new(text: &str, language: LanguageCode, source: DetectionSource) -> Self {
        Self {
            text: text.to_string(),
            language,
            source,
        }
    }
}

/// Romanized greetings that are strong Hindi evidence when the
/// statistical detector wanders off to an unrelated language
const ROMANIZED_HINDI_HINTS: [&str; 2] = ["namaste", "namaskar"];

/// Curated lexicons per language, scanned in precedence order. First hit
/// wins. Marathi has no entries: it shares Devanagari with Hindi, so any
/// list here would be shadowed by Hindi's precedence; Marathi rides on
/// the statistical detector instead.
const LEXICONS: [(LanguageCode, &[&str]); 10] = [
    (
        LanguageCode::Hi,
        &[
            "नमस्ते", "namaste", "namaskar", "नमस्कार", "हैलो", "हेलो", "हिंदी", "किसान", "खेती",
            "फसल", "बाजार", "मंडी", "कीमत", "भाव", "बीज", "खाद", "पानी", "सिंचाई", "खरपतवार",
            "बीमारी", "कीड़े", "दवा", "उर्वरक", "मिट्टी", "करेला", "टमाटर", "प्याज", "आलू", "चावल",
            "गेहूं", "धान", "मक्का", "गन्ना", "कपास",
        ],
    ),
    (
        LanguageCode::Bn,
        &[
            "হ্যালো", "নমস্কার", "আমি", "দাম", "কত", "চাল", "আলু", "টমেটো", "পেঁয়াজ", "শসা",
            "কৃষক", "চাষ", "বাজার", "মূল্য",
        ],
    ),
    (
        LanguageCode::Ta,
        &[
            "வணக்கம்", "நான்", "விலை", "என்ன", "அரிசி", "வெள்ளரி", "தக்காளி", "வெங்காயம்",
            "உருளை", "விவசாயி", "சாகுபடி", "சந்தை",
        ],
    ),
    (
        LanguageCode::Te,
        &[
            "నమస్కారం", "హలో", "నేను", "ధర", "ఎంత", "బియ్యం", "పుచ్చకాయ", "టమాటో", "ఉల్లిపాయ",
            "బంగాళదుంప", "రైతు", "వ్యవసాయం", "మార్కెట్",
        ],
    ),
    (
        LanguageCode::Kn,
        &[
            "ನಮಸ್ಕಾರ", "ಹಲೋ", "ನಾನು", "ಬೆಲೆ", "ಎಷ್ಟು", "ಅಕ್ಕಿ", "ಸೌತೆಕಾಯಿ", "ಟೊಮೇಟೊ",
            "ಈರುಳ್ಳಿ", "ಆಲೂಗೆಡ್ಡೆ", "ರೈತ", "ಕೃಷಿ", "ಮಾರುಕಟ್ಟೆ",
        ],
    ),
    (
        LanguageCode::Gu,
        &[
            "નમસ્તે", "હેલો", "હું", "ભાવ", "કેટલો", "ચોખા", "કાકડી", "ટમેટા", "ડુંગળી", "બટાકા",
            "ખેડૂત", "ખેતી", "બજાર",
        ],
    ),
    (
        LanguageCode::Ml,
        &[
            "നമസ്കാരം", "ഹലോ", "ഞാൻ", "വില", "എത്ര", "അരി", "വെള്ളരി", "തക്കാളി", "ഉള്ളി",
            "ഉരുളക്കിഴങ്ങ്", "കർഷകൻ", "കൃഷി", "മാർക്കറ്റ്",
        ],
    ),
    (
        LanguageCode::Pa,
        &[
            "ਨਮਸਤੇ", "ਹੈਲੋ", "ਮੈਂ", "ਕੀਮਤ", "ਕਿੰਨੀ", "ਚਾਵਲ", "ਖੀਰਾ", "ਟਮਾਟਰ", "ਪਿਆਜ਼", "ਆਲੂ",
            "ਕਿਸਾਨ", "ਖੇਤੀ", "ਮੰਡੀ",
        ],
    ),
    (
        LanguageCode::Or,
        &[
            "ନମସ୍କାର", "ହେଲୋ", "ମୁଁ", "ଦର", "କେତେ", "ଚାଉଳ", "ଟମାଟୋ", "ପିଆଜ", "ଆଳୁ", "ଚାଷୀ",
            "ଚାଷ", "ବଜାର",
        ],
    ),
    (
        LanguageCode::As,
        &["নমস্কাৰ", "মই", "কিমান", "খেতিয়ক", "বজাৰ", "ধানৰ"],
    ),
];

/// Lexicon-first language detector over the supported set.
///
/// `detect` is total: it always returns a supported language, falling
/// back to Hindi (the deployment's default regional language) when the
/// statistical detector fails or produces an unsupported result, and to
/// English only for empty input.
#[derive(Debug, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self
    }

    /// Detect the language of `text`. Never fails.
    pub fn detect(&self, text: &str) -> DetectionResult {
        let trimmed = text.trim();

        // Empty input is English by convention, and explicitly marked as a
        // fallback so it is never mistaken for a real detector verdict.
        if trimmed.is_empty() {
            return DetectionResult::new(text, LanguageCode::En, DetectionSource::DefaultFallback);
        }

        let lower = trimmed.to_lowercase();

        // Stage 1: curated lexicons, first hit wins
        for (language, patterns) in LEXICONS {
            for pattern in patterns {
                if lower.contains(pattern) {
                    debug!(
                        "Detected {} via lexicon entry {:?} for: {:.40}",
                        language, pattern, trimmed
                    );
                    return DetectionResult::new(text, language, DetectionSource::PatternMatch);
                }
            }
        }

        // Stage 2: statistical detection
        let info = match whatlang::detect(trimmed) {
            Some(info) => info,
            None => {
                warn!(
                    "Statistical detection produced no result, defaulting to {}: {:.40}",
                    LanguageCode::DEFAULT_REGIONAL,
                    trimmed
                );
                return DetectionResult::new(
                    text,
                    LanguageCode::DEFAULT_REGIONAL,
                    DetectionSource::DefaultFallback,
                );
            }
        };

        match LanguageCode::from_part3(info.lang().code()) {
            // Stage 3: in-set statistical result
            Some(language) => {
                debug!("Detected {} statistically for: {:.40}", language, trimmed);
                DetectionResult::new(text, language, DetectionSource::Statistical)
            }
            None => {
                // Stage 4: known misdetections of Hindi-adjacent text as
                // unrelated languages, corrected on character or keyword
                // evidence
                if contains_devanagari(trimmed)
                    || ROMANIZED_HINDI_HINTS.iter().any(|hint| lower.contains(hint))
                {
                    info!(
                        "Corrected statistical result {:?} to hi for: {:.40}",
                        info.lang(),
                        trimmed
                    );
                    return DetectionResult::new(
                        text,
                        LanguageCode::Hi,
                        DetectionSource::Corrected,
                    );
                }

                // Set restriction: unsupported result, no evidence either
                // way; the target population is assumed non-English-dominant
                info!(
                    "Statistical result {:?} outside supported set, restricting to hi for: {:.40}",
                    info.lang(),
                    trimmed
                );
                DetectionResult::new(text, LanguageCode::Hi, DetectionSource::Statistical)
            }
        }
    }
}
