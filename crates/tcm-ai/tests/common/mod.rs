use std::collections::VecDeque;
use std::sync::Mutex;

use futures::future::BoxFuture;
use tcm_ai::error::AiError;
use tcm_ai::provider::{CompletionProvider, CompletionRequest};

/// Replays canned replies in order and records every request it saw.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }
}

impl CompletionProvider for ScriptedProvider {
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()));
        Box::pin(async move { next.map_err(AiError::Invocation) })
    }
}
