// shared test doubles: scripted resolvers and canned transcripts

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use vidchat::{Error, FeedbackLog, Message, Registry, Resolver, Session, TranscriptProvider};

/// Every history a resolver was queried with.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<Vec<Message>>>>);

impl Calls {
    pub fn all(&self) -> Vec<Vec<Message>> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

pub struct ScriptedResolver {
    reply: Result<Vec<String>, String>,
    calls: Calls,
}

impl ScriptedResolver {
    pub fn replying(reply: &str) -> (Self, Calls) {
        Self::new(Ok(vec![reply.to_string()]))
    }

    pub fn replying_many(replies: &[&str]) -> (Self, Calls) {
        Self::new(Ok(replies.iter().map(|r| r.to_string()).collect()))
    }

    pub fn failing(message: &str) -> (Self, Calls) {
        Self::new(Err(message.to_string()))
    }

    fn new(reply: Result<Vec<String>, String>) -> (Self, Calls) {
        let calls = Calls::default();
        (
            Self {
                reply,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl Resolver for ScriptedResolver {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn query(&self, history: &[Message]) -> Result<Vec<String>, Error> {
        self.calls.0.lock().unwrap().push(history.to_vec());
        self.reply.clone().map_err(Error::ResolverQuery)
    }
}

/// Serves transcripts from a fixed map; anything else fails.
#[derive(Default)]
pub struct FakeTranscripts(HashMap<String, String>);

impl FakeTranscripts {
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[async_trait]
impl TranscriptProvider for FakeTranscripts {
    async fn fetch(&self, source: &str) -> Result<String, Error> {
        self.0
            .get(source)
            .cloned()
            .ok_or_else(|| Error::Transcript(format!("video unavailable: {source}")))
    }
}

pub fn session(
    resolvers: Vec<(&str, ScriptedResolver)>,
    transcripts: FakeTranscripts,
    log: &Path,
) -> Session {
    let mut registry = Registry::new();
    for (name, resolver) in resolvers {
        registry.insert(name, Box::new(resolver)).unwrap();
    }
    Session::new(registry, transcripts, FeedbackLog::new(log))
}
