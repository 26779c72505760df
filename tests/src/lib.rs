//! Instrumented test doubles for exercising the answer pipeline without any
//! network collaborators.

pub mod doubles {
    use application::chat_service::{AnswerStream, Embedder, Generator, Retriever};
    use async_trait::async_trait;
    use domain::models::{ConversationMessage, RetrievedMatch};
    use futures::stream::{self, StreamExt};
    use shared::types::Result;
    use std::sync::{Arc, Mutex};

    /// Records the order in which the pipeline touches its collaborators.
    #[derive(Clone, Default)]
    pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

    impl CallLog {
        pub fn record(&self, step: &'static str) {
            self.0.lock().unwrap().push(step);
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    pub struct StubEmbedder {
        pub log: CallLog,
        pub vector: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.log.record("embed");
            Ok(self.vector.clone())
        }
    }

    pub struct StubRetriever {
        pub log: CallLog,
        pub matches: Vec<RetrievedMatch>,
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn query(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<RetrievedMatch>> {
            self.log.record("retrieve");
            Ok(self.matches.clone())
        }
    }

    /// Shared handle for inspecting the prompt the generator was given after
    /// the service has consumed the stub.
    pub type SeenPrompt = Arc<Mutex<Option<Vec<ConversationMessage>>>>;

    /// Replays a scripted fragment sequence and captures the composed
    /// prompt. The script is one-shot, like the real stream.
    pub struct StubGenerator {
        pub log: CallLog,
        script: Mutex<Option<Vec<Result<String>>>>,
        seen: SeenPrompt,
    }

    impl StubGenerator {
        pub fn new(log: CallLog, script: Vec<Result<String>>) -> (Self, SeenPrompt) {
            let seen: SeenPrompt = Arc::new(Mutex::new(None));
            let stub = Self {
                log,
                script: Mutex::new(Some(script)),
                seen: seen.clone(),
            };
            (stub, seen)
        }
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn stream_chat(&self, messages: &[ConversationMessage]) -> Result<AnswerStream> {
            self.log.record("generate");
            *self.seen.lock().unwrap() = Some(messages.to_vec());
            let script = self
                .script
                .lock()
                .unwrap()
                .take()
                .expect("generation stream is one-shot");
            Ok(stream::iter(script).boxed())
        }
    }
}
