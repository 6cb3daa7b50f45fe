// http server mode - drive the session over a json api

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{Error, FEEDBACK_THANKS, Session, TRANSCRIPT_LOADED};

// one session shared by every request; the lock runs actions one at a time
type SharedSession = Arc<Mutex<Session>>;

#[derive(Deserialize)]
struct ResolverRequest {
    name: String,
}

#[derive(Deserialize)]
struct TranscriptRequest {
    url: String,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Deserialize)]
struct FeedbackRequest {
    rating: String,
}

#[derive(Serialize, Default)]
struct ActionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ResolversResponse {
    resolvers: Vec<String>,
    active: Option<String>,
}

#[derive(Serialize)]
struct SessionResponse {
    active: Option<String>,
    transcript_chars: usize,
    last_question: Option<String>,
    last_response: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub struct Server;

impl Server {
    pub async fn run(session: Session, host: &str, port: u16) -> Result<(), Error> {
        let app = Self::router(session);

        let addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        info!("server running at http://{addr}");
        println!("server running at http://{addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    pub fn router(session: Session) -> Router {
        let state: SharedSession = Arc::new(Mutex::new(session));

        Router::new()
            .route("/health", get(health))
            .route("/resolvers", get(resolvers))
            .route("/session", get(session_state))
            .route("/resolver", post(select_resolver))
            .route("/transcript", post(load_transcript))
            .route("/ask", post(ask))
            .route("/feedback", post(feedback))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn resolvers(State(state): State<SharedSession>) -> Json<ResolversResponse> {
    let session = state.lock().await;
    Json(ResolversResponse {
        resolvers: session.resolver_names(),
        active: session.active_resolver().map(str::to_string),
    })
}

async fn session_state(State(state): State<SharedSession>) -> Json<SessionResponse> {
    let session = state.lock().await;
    Json(SessionResponse {
        active: session.active_resolver().map(str::to_string),
        transcript_chars: session.transcript().chars().count(),
        last_question: session.last_question().map(str::to_string),
        last_response: session.last_response().map(str::to_string),
    })
}

async fn select_resolver(
    State(state): State<SharedSession>,
    Json(req): Json<ResolverRequest>,
) -> (StatusCode, Json<ActionResponse>) {
    let mut session = state.lock().await;
    match session.select_resolver(&req.name) {
        Ok(()) => message(format!("Using {}.", req.name)),
        Err(e) => failure(e),
    }
}

async fn load_transcript(
    State(state): State<SharedSession>,
    Json(req): Json<TranscriptRequest>,
) -> (StatusCode, Json<ActionResponse>) {
    let mut session = state.lock().await;
    match session.load_transcript(&req.url).await {
        Ok(_) => message(TRANSCRIPT_LOADED.to_string()),
        Err(e) => failure(e),
    }
}

async fn ask(
    State(state): State<SharedSession>,
    Json(req): Json<AskRequest>,
) -> (StatusCode, Json<ActionResponse>) {
    let mut session = state.lock().await;
    match session.ask(&req.question).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ActionResponse {
                reply: Some(reply),
                ..Default::default()
            }),
        ),
        Err(e) => failure(e),
    }
}

async fn feedback(
    State(state): State<SharedSession>,
    Json(req): Json<FeedbackRequest>,
) -> (StatusCode, Json<ActionResponse>) {
    let mut session = state.lock().await;
    match session.record_feedback(&req.rating) {
        Ok(_) => message(FEEDBACK_THANKS.to_string()),
        Err(e) => failure(e),
    }
}

fn message(text: String) -> (StatusCode, Json<ActionResponse>) {
    (
        StatusCode::OK,
        Json(ActionResponse {
            message: Some(text),
            ..Default::default()
        }),
    )
}

// every failure becomes a display string; the status says whose fault it was
fn failure(e: Error) -> (StatusCode, Json<ActionResponse>) {
    let status = match e {
        Error::Transcript(_) | Error::ResolverQuery(_) => StatusCode::BAD_GATEWAY,
        Error::FeedbackLog(_) | Error::Json(_) | Error::Server(_) | Error::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Error::UnknownResolver(_)
        | Error::NoResolverSelected
        | Error::NoPendingAnswer
        | Error::InvalidRating(_) => StatusCode::BAD_REQUEST,
    };

    warn!(status = status.as_u16(), error = %e, "action failed");
    (
        status,
        Json(ActionResponse {
            error: Some(e.to_string()),
            ..Default::default()
        }),
    )
}
