// core logic - resolvers, transcripts, feedback, and the session tying them together

mod claude;
mod feedback;
mod openai;
mod registry;
mod resolver;
mod session;
mod transcript;

pub use claude::Claude;
pub use feedback::{FeedbackLog, FeedbackRecord, Rating};
pub use openai::OpenAi;
pub use registry::{Registry, ResolverConfig};
pub use resolver::{Message, Resolver, Role};
pub use session::{FEEDBACK_THANKS, Session, TRANSCRIPT_LOADED, combined_prompt};
pub use transcript::{TranscriptProvider, YouTube, video_id};
