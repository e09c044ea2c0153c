/*!
 * # Kisan Vaani - multilingual message-quality pipeline
 *
 * A Rust library that takes raw user messages in ~12 Indian languages (or
 * English), figures out which language they are in, scrubs corruption
 * artifacts, translates to English for answer generation, validates the
 * generated and translated output for script-mixing corruption, and
 * produces a final response in the user's language with safe localized
 * fallbacks when anything fails.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `language`: Supported language codes and ISO mapping
 * - `detection`: Lexicon-first language detection with statistical fallback
 * - `normalize`: Corruption-stripping text normalizer
 * - `script`: Corruption heuristics shared by normalizer and validator
 * - `translation`: Working-language translation orchestration
 * - `validation`: Response quality validation:
 *   - `validation::common`: Language-independent checks
 *   - `validation::scripts`: Latin and Devanagari script checks
 * - `providers`: External capability clients:
 *   - `providers::http`: REST translation endpoint client
 *   - `providers::mock`: Scriptable test doubles
 * - `conversation`: Per-user exchange history with bounded retention
 * - `pipeline`: The end-to-end orchestrator
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod conversation;
pub mod detection;
pub mod errors;
pub mod language;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod script;
pub mod translation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use conversation::{ConversationStore, Exchange, SqliteConversationStore};
pub use detection::{DetectionResult, DetectionSource, LanguageDetector};
pub use errors::{AppError, ProviderError, StoreError};
pub use language::LanguageCode;
pub use normalize::TextNormalizer;
pub use pipeline::PipelineOrchestrator;
pub use translation::Translator;
pub use validation::{ResponseValidator, ValidationVerdict};
