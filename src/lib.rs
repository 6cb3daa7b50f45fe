// vidchat library - chat with an ai about a video transcript

pub mod cli;
mod core;
mod error;
mod output;
mod server;
pub mod tui;

pub use crate::core::{
    Claude, FEEDBACK_THANKS, FeedbackLog, FeedbackRecord, Message, OpenAi, Rating, Registry,
    Resolver, ResolverConfig, Role, Session, TRANSCRIPT_LOADED, TranscriptProvider, YouTube,
    combined_prompt, video_id,
};
pub use error::Error;
pub use output::Output;
pub use server::Server;
