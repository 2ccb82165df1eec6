//! HTTP surface.
//!
//! Every request answers 200 with a JSON body, including bodies that fail to
//! deserialize; failures are reported as `{"error": ...}` objects rather than
//! status codes.

mod routes;
mod state;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::error::Result;

pub use routes::{
    AnalyzeEmailRequest, ChatRequest, GenerateEmailRequest, JsonBody, RegisterLeadRequest,
    RegisterProjectRequest, SummarizeFeedbackRequest,
};
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/register_project/", post(routes::register_project))
        .route("/generate_email/", post(routes::generate_email))
        .route("/chatbot/", post(routes::chatbot))
        .route("/analyze_email_issues/", post(routes::analyze_email_issues))
        .route("/handle_email_rejection/", post(routes::handle_email_rejection))
        .route("/summarize_feedback/", post(routes::summarize_feedback))
        .route("/register_lead/", post(routes::register_lead))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Serves on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

pub async fn run_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
