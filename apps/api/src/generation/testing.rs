//! Scripted `CompletionClient` for pipeline and handler tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::generation::pipeline::{
    COVER_LETTER_MAX_TOKENS, HR_MESSAGE_MAX_TOKENS, RESUME_MAX_TOKENS,
};
use crate::llm_client::{CompletionClient, CompletionOptions, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub max_tokens: u32,
}

enum Script {
    /// Replies handed out in call order.
    Queue(VecDeque<Result<String, LlmError>>),
    /// One reply per document type, keyed by token budget; order-independent so
    /// concurrent calls get the right answer.
    Routed {
        resume: Option<Result<String, LlmError>>,
        cover_letter: Option<Result<String, LlmError>>,
        hr_message: Option<Result<String, LlmError>>,
    },
}

pub struct ScriptedClient {
    script: Mutex<Script>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self::with_script(Script::Queue(replies.into()))
    }

    pub fn routed(
        resume: Result<String, LlmError>,
        cover_letter: Result<String, LlmError>,
        hr_message: Result<String, LlmError>,
    ) -> Self {
        Self::with_script(Script::Routed {
            resume: Some(resume),
            cover_letter: Some(cover_letter),
            hr_message: Some(hr_message),
        })
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            max_tokens: options.max_tokens,
        });

        let mut script = self.script.lock().unwrap();
        let reply = match &mut *script {
            Script::Queue(queue) => queue.pop_front(),
            Script::Routed {
                resume,
                cover_letter,
                hr_message,
            } => match options.max_tokens {
                RESUME_MAX_TOKENS => resume.take(),
                COVER_LETTER_MAX_TOKENS => cover_letter.take(),
                HR_MESSAGE_MAX_TOKENS => hr_message.take(),
                other => panic!("unexpected max_tokens {other}"),
            },
        };
        reply.unwrap_or_else(|| panic!("ScriptedClient ran out of replies"))
    }
}
