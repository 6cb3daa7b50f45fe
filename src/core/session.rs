// session - the one piece of state the app carries between actions

use crate::Error;
use crate::core::feedback::{FeedbackLog, FeedbackRecord, Rating};
use crate::core::registry::Registry;
use crate::core::resolver::Message;
use crate::core::transcript::TranscriptProvider;
use tracing::{debug, info, warn};

pub const TRANSCRIPT_LOADED: &str = "Video processed. You can start asking questions now.";
pub const FEEDBACK_THANKS: &str = "Thank you for your feedback!";

// last question and the answer it got, kept until it has been rated
#[derive(Debug, Clone)]
struct Exchange {
    question: String,
    response: String,
}

// every operation either succeeds completely or leaves the session as it was
pub struct Session {
    registry: Registry,
    transcripts: Box<dyn TranscriptProvider>,
    feedback: FeedbackLog,
    active: Option<String>,
    transcript: String,
    pending: Option<Exchange>,
}

impl Session {
    pub fn new(
        registry: Registry,
        transcripts: impl TranscriptProvider + 'static,
        feedback: FeedbackLog,
    ) -> Self {
        Self {
            registry,
            transcripts: Box::new(transcripts),
            feedback,
            active: None,
            transcript: String::new(),
            pending: None,
        }
    }

    pub fn select_resolver(&mut self, name: &str) -> Result<(), Error> {
        if !self.registry.contains(name) {
            return Err(Error::UnknownResolver(name.to_string()));
        }

        if self.active.as_deref() != Some(name) {
            info!(resolver = %name, "resolver selected");
            self.active = Some(name.to_string());
        }
        Ok(())
    }

    // returns the length in chars; the pending answer survives
    pub async fn load_transcript(&mut self, source: &str) -> Result<usize, Error> {
        let transcript = match self.transcripts.fetch(source).await {
            Ok(t) => t,
            Err(e) => {
                warn!(source = %source, error = %e, "transcript fetch failed");
                return Err(match e {
                    Error::Transcript(_) => e,
                    other => Error::Transcript(other.to_string()),
                });
            }
        };

        let chars = transcript.chars().count();
        self.transcript = transcript;
        Ok(chars)
    }

    pub async fn ask(&mut self, question: &str) -> Result<String, Error> {
        let name = self.active.as_deref().ok_or(Error::NoResolverSelected)?;
        let resolver = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownResolver(name.to_string()))?;

        let history = [Message::user(combined_prompt(&self.transcript, question))];
        debug!(resolver = %name, model = resolver.model(), "asking");

        let replies = resolver.query(&history).await.map_err(|e| match e {
            Error::ResolverQuery(_) => e,
            other => Error::ResolverQuery(other.to_string()),
        })?;

        let reply = replies
            .into_iter()
            .next()
            .ok_or_else(|| Error::ResolverQuery(format!("{name} returned no reply")))?;

        self.pending = Some(Exchange {
            question: question.to_string(),
            response: reply.clone(),
        });
        Ok(reply)
    }

    pub fn record_feedback(&mut self, rating: &str) -> Result<Rating, Error> {
        let rating: Rating = rating.parse()?;
        let exchange = self.pending.as_ref().ok_or(Error::NoPendingAnswer)?;

        let record = FeedbackRecord {
            question: exchange.question.clone(),
            response: exchange.response.clone(),
            rating,
        };
        self.feedback.append(&record)?;

        info!(rating = %rating, "feedback recorded");
        self.pending = None;
        Ok(rating)
    }

    pub fn active_resolver(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn last_question(&self) -> Option<&str> {
        self.pending.as_ref().map(|e| e.question.as_str())
    }

    pub fn last_response(&self) -> Option<&str> {
        self.pending.as_ref().map(|e| e.response.as_str())
    }

    pub fn has_pending_answer(&self) -> bool {
        self.pending.is_some()
    }

    pub fn resolver_names(&self) -> Vec<String> {
        self.registry.names()
    }
}

pub fn combined_prompt(transcript: &str, question: &str) -> String {
    format!("Context: {transcript}\nQuestion: {question}")
}
