/*!
 * Conversation history behavior through the full pipeline.
 */

use kisanvaani::conversation::{ConversationStore, MAX_EXCHANGES};
use kisanvaani::providers::mock::MockAnswer;

use crate::common::{CLEAN_HINDI_ANSWER, build_pipeline};

#[tokio::test]
async fn test_pipeline_shouldCapHistoryAtTenExchanges() {
    let (pipeline, store, _) = build_pipeline(MockAnswer::with_answer(CLEAN_HINDI_ANSWER));

    for n in 0..15 {
        pipeline
            .process_message("farmer-1", "Ravi", &format!("गेहूं का भाव बताइए दिन {}", n))
            .await;
    }

    let history = store.get("farmer-1").await.unwrap();
    assert_eq!(history.len(), MAX_EXCHANGES);
    assert!(history[0].user_message.ends_with("दिन 5"));
    assert!(history[9].user_message.ends_with("दिन 14"));
}

#[tokio::test]
async fn test_pipeline_shouldPassHistoryToGenerator() {
    let (pipeline, _, answers) = build_pipeline(MockAnswer::with_answer(CLEAN_HINDI_ANSWER));

    pipeline
        .process_message("farmer-1", "Ravi", "गेहूं का भाव क्या चल रहा है आज")
        .await;
    pipeline
        .process_message("farmer-1", "Ravi", "कल मंडी में बेचना ठीक रहेगा क्या")
        .await;

    let requests = answers.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].history.is_empty());
    assert_eq!(requests[1].history.len(), 1);
    assert_eq!(requests[1].history[0].final_response, CLEAN_HINDI_ANSWER);
}

#[tokio::test]
async fn test_pipeline_shouldKeepUsersIsolated() {
    let (pipeline, store, _) = build_pipeline(MockAnswer::with_answer(CLEAN_HINDI_ANSWER));

    pipeline
        .process_message("farmer-1", "Ravi", "गेहूं का भाव क्या चल रहा है आज")
        .await;
    pipeline
        .process_message("farmer-2", "Sita", "कल मंडी में बेचना ठीक रहेगा क्या")
        .await;

    assert_eq!(store.get("farmer-1").await.unwrap().len(), 1);
    assert_eq!(store.get("farmer-2").await.unwrap().len(), 1);
}
