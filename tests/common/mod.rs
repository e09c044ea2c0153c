/*!
 * Common test utilities for the kisanvaani test suite
 */

use std::sync::Arc;

use kisanvaani::conversation::SqliteConversationStore;
use kisanvaani::pipeline::PipelineOrchestrator;
use kisanvaani::providers::mock::{MockAnswer, MockTranslation};

/// A clean Hindi answer that passes validation in Hindi
pub const CLEAN_HINDI_ANSWER: &str =
    "गेहूं की कीमत आज मंडी में अच्छी चल रही है। आप कल सुबह बेच सकते हैं।";

/// Initialize logging once so RUST_LOG surfaces pipeline logs in tests
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wire a pipeline with passthrough translation, the given answer mock
/// and an in-memory store. Returns handles for assertions.
pub fn build_pipeline(
    answers: MockAnswer,
) -> (
    PipelineOrchestrator,
    Arc<SqliteConversationStore>,
    Arc<MockAnswer>,
) {
    init_test_logging();

    let store = Arc::new(SqliteConversationStore::new_in_memory().unwrap());
    let answers = Arc::new(answers);
    let pipeline = PipelineOrchestrator::new(
        Arc::new(MockTranslation::new()),
        answers.clone(),
        store.clone(),
    );
    (pipeline, store, answers)
}
