use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("Config error: {0}")]
    #[diagnostic(
        code(vidchat::config),
        help("check the resolver file passed with --config (or VIDCHAT_CONFIG)")
    )]
    Config(String),

    #[error("Unknown resolver: {0}")]
    #[diagnostic(code(vidchat::unknown_resolver))]
    UnknownResolver(String),

    #[error("Please select an AI model first.")]
    #[diagnostic(code(vidchat::no_resolver))]
    NoResolverSelected,

    #[error("Transcript error: {0}")]
    #[diagnostic(code(vidchat::transcript))]
    Transcript(String),

    #[error("Resolver error: {0}")]
    #[diagnostic(code(vidchat::resolver))]
    ResolverQuery(String),

    #[error("No answer to rate yet. Ask a question first.")]
    #[diagnostic(code(vidchat::no_pending_answer))]
    NoPendingAnswer,

    #[error("Invalid rating '{0}'. Use positive or negative.")]
    #[diagnostic(code(vidchat::invalid_rating))]
    InvalidRating(String),

    #[error("Feedback log error: {0}")]
    #[diagnostic(code(vidchat::feedback_log))]
    FeedbackLog(std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(vidchat::json))]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    #[diagnostic(code(vidchat::server))]
    Server(String),
}

impl Error {
    // only a broken config stops the app, everything else is shown to the user
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
