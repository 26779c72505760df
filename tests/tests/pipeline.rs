use application::chat_service::ChatService;
use application::prompt::CONTEXT_HEADER;
use domain::models::{ConversationMessage, RetrievedMatch};
use futures::StreamExt;
use serde_json::json;
use shared::types::{PipelineError, Result};
use tests::doubles::{CallLog, StubEmbedder, StubGenerator, StubRetriever};

fn sample_match(id: &str, subject: &str, stars: f64) -> RetrievedMatch {
    serde_json::from_value(json!({
        "id": id,
        "metadata": { "subject": subject, "stars": stars }
    }))
    .unwrap()
}

fn service(
    log: &CallLog,
    matches: Vec<RetrievedMatch>,
    script: Vec<Result<String>>,
) -> (
    ChatService<StubEmbedder, StubRetriever, StubGenerator>,
    tests::doubles::SeenPrompt,
) {
    let embedder = StubEmbedder {
        log: log.clone(),
        vector: vec![0.1, 0.2, 0.3],
    };
    let retriever = StubRetriever {
        log: log.clone(),
        matches,
    };
    let (generator, seen) = StubGenerator::new(log.clone(), script);
    (ChatService::new(embedder, retriever, generator, 5), seen)
}

#[tokio::test]
async fn executes_steps_in_fixed_order() {
    let log = CallLog::default();
    let (service, _) = service(
        &log,
        vec![sample_match("Dr. A", "CS101", 4.7)],
        vec![Ok("answer".to_string())],
    );

    let conversation = vec![ConversationMessage::user("who teaches CS101?")];
    let stream = service.answer(&conversation).await.unwrap();
    let _fragments: Vec<_> = stream.collect().await;

    assert_eq!(log.calls(), vec!["embed", "retrieve", "generate"]);
}

#[tokio::test]
async fn empty_conversation_fails_before_any_external_call() {
    let log = CallLog::default();
    let (service, _) = service(&log, vec![], vec![]);

    let err = service.answer(&[]).await.err().unwrap();

    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn non_user_tail_fails_before_any_external_call() {
    let log = CallLog::default();
    let (service, _) = service(&log, vec![], vec![]);

    let conversation = vec![
        ConversationMessage::user("hello"),
        ConversationMessage::assistant("hi there"),
    ];
    let err = service.answer(&conversation).await.err().unwrap();

    assert!(matches!(err, PipelineError::MalformedConversation(_)));
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn empty_retrieval_still_streams_with_header_only_context() {
    let log = CallLog::default();
    let (service, seen) = service(&log, vec![], vec![Ok("no strong matches".to_string())]);

    let conversation = vec![ConversationMessage::user("who teaches underwater basket weaving?")];
    let stream = service.answer(&conversation).await.unwrap();
    let fragments: Vec<_> = stream.map(|f| f.unwrap()).collect().await;

    assert_eq!(fragments, vec!["no strong matches"]);

    let prompt = seen.lock().unwrap().clone().unwrap();
    let last = &prompt.last().unwrap().content;
    assert!(last.contains(CONTEXT_HEADER.trim_end()));
    assert!(!last.contains("Professor:"));
}

#[tokio::test]
async fn composed_prompt_reaches_generator_with_match_fields() {
    let log = CallLog::default();
    let (service, seen) = service(
        &log,
        vec![sample_match("Dr. A", "CS101", 4.7)],
        vec![Ok("Dr. A it is".to_string())],
    );

    let conversation = vec![ConversationMessage::user(
        "Who teaches best for introductory algorithms?",
    )];
    let stream = service.answer(&conversation).await.unwrap();
    let _fragments: Vec<_> = stream.collect().await;

    let prompt = seen.lock().unwrap().clone().unwrap();
    let last = &prompt.last().unwrap().content;
    assert!(last.contains("Who teaches best for introductory algorithms?"));
    assert!(last.contains("Dr. A"));
    assert!(last.contains("CS101"));
    assert!(last.contains("4.7"));
}

#[tokio::test]
async fn fragments_arrive_in_order_until_interruption() {
    let log = CallLog::default();
    let (service, _) = service(
        &log,
        vec![sample_match("Prof X", "CS301", 4.9)],
        vec![
            Ok("Prof".to_string()),
            Ok(" X is".to_string()),
            Ok(" great.".to_string()),
            Err(PipelineError::StreamInterrupted("connection reset".into())),
        ],
    );

    let conversation = vec![ConversationMessage::user("is Prof X any good?")];
    let stream = service.answer(&conversation).await.unwrap();
    let out: Vec<_> = stream.collect().await;

    let delivered: String = out
        .iter()
        .take_while(|f| f.is_ok())
        .map(|f| f.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(delivered, "Prof X is great.");
    assert!(matches!(
        out.last().unwrap(),
        Err(PipelineError::StreamInterrupted(_))
    ));
}

#[tokio::test]
async fn out_of_order_retrieval_is_passed_through_unchanged() {
    let log = CallLog::default();
    let (service, seen) = service(
        &log,
        vec![
            sample_match("Dr. Low", "CS101", 2.1),
            sample_match("Dr. High", "CS101", 4.9),
        ],
        vec![Ok("both listed".to_string())],
    );

    let conversation = vec![ConversationMessage::user("rank the CS101 staff")];
    let stream = service.answer(&conversation).await.unwrap();
    let _fragments: Vec<_> = stream.collect().await;

    let prompt = seen.lock().unwrap().clone().unwrap();
    let last = &prompt.last().unwrap().content;
    let low = last.find("Dr. Low").unwrap();
    let high = last.find("Dr. High").unwrap();
    assert!(low < high, "composition must not re-rank retrieval order");
}
