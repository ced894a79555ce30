//! HTTP gateway for Sommelier.
//!
//! Serves the embedded chat frontend and the single API route the
//! widget talks to:
//!
//! - `GET  /`                — the chat page
//! - `GET  /health`          — liveness probe
//! - `POST /api/chat`        — one agent turn or command round
//!
//! The route decides which dispatch path to take: a `message` goes to
//! `run_turn`; otherwise a `command` goes to `run_command` — but only
//! when it is non-empty, not `"Non"`-prefixed (the protocol's "no
//! command" sentinel), and shaped like `Name[argument]`. A reply whose
//! parse produced no `message` field is replaced by a fixed apology so
//! the widget always has something to show.
//!
//! Built on Axum, like the rest of the async stack.

pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use sommelier_agent::{ChatAgent, parse_command};
use sommelier_core::response::AgentResponse;

/// The fixed reply when a turn fails or parses without a message.
const APOLOGY: &str = "Sorry, something went wrong, please try again later.";

/// The fixed reply when the request carries nothing actionable.
const DONT_UNDERSTAND: &str = "Sorry, I don't understand.";

type SharedAgent = Arc<ChatAgent>;

/// Build the router with all gateway routes.
pub fn build_router(agent: SharedAgent) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .with_state(agent)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Builds every subsystem once — provider, corpus, index, registry,
/// store, agent — and shares them via `Arc`.
pub async fn start(
    config: sommelier_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let api_key = config.api_key.clone().ok_or(
        "No API key configured — set SOMMELIER_API_KEY or OPENAI_API_KEY",
    )?;

    let provider = Arc::new(sommelier_providers::OpenAiCompatProvider::new(
        "openai",
        &config.api_base_url,
        api_key,
    ));

    let documents = sommelier_memory::load_corpus(&config.corpus_path)?;
    info!(
        documents = documents.len(),
        path = %config.corpus_path,
        "Corpus loaded"
    );

    let index = Arc::new(sommelier_memory::DocumentIndex::new(
        documents,
        provider.clone(),
        &config.embedding_model,
    ));

    let registry = sommelier_tools::default_registry(index, config.search_top_k);
    let store = sommelier_memory::ConversationStore::new(config.history_window);

    let agent = Arc::new(
        ChatAgent::new(
            provider,
            &config.model,
            config.temperature,
            registry,
            store,
            config.history_window,
        )
        .with_max_tokens(config.max_tokens),
    );

    let app = build_router(agent);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    #[serde(default)]
    user_id: String,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    command: Option<String>,
}

fn message_only(text: &str) -> AgentResponse {
    AgentResponse {
        message: Some(text.to_string()),
        ..Default::default()
    }
}

async fn chat_handler(
    State(agent): State<SharedAgent>,
    Json(payload): Json<ChatRequest>,
) -> (StatusCode, Json<AgentResponse>) {
    if payload.user_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(message_only("Missing required parameters.")),
        );
    }

    if let Some(message) = payload.message.as_deref().filter(|m| !m.is_empty()) {
        return respond(agent.run_turn(&payload.user_id, message).await);
    }

    if let Some(command) = payload.command.as_deref() {
        if !command.is_empty() && !command.starts_with("Non") && parse_command(command).is_some() {
            return respond(agent.run_command(&payload.user_id, command).await);
        }
    }

    (StatusCode::OK, Json(message_only(DONT_UNDERSTAND)))
}

/// Map an agent result to the wire: a parse without a message becomes
/// the apology; a failed call is logged and becomes a 502 apology.
fn respond(
    result: sommelier_core::Result<AgentResponse>,
) -> (StatusCode, Json<AgentResponse>) {
    match result {
        Ok(response) => {
            if response.message.is_none() {
                return (StatusCode::OK, Json(message_only(APOLOGY)));
            }
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            error!(error = %e, "Agent call failed");
            (StatusCode::BAD_GATEWAY, Json(message_only(APOLOGY)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use sommelier_core::capability::CapabilityRegistry;
    use sommelier_core::error::ProviderError;
    use sommelier_core::provider::{Completion, CompletionRequest, Provider};
    use sommelier_memory::ConversationStore;
    use tower::ServiceExt;

    const TAGGED_REPLY: &str = "<FEELINGS>warm</FEELINGS>\n<COMMAND>None</COMMAND>\n<MESSAGE>Welcome! What are you eating tonight? \u{1f377}</MESSAGE>";

    struct FixedProvider {
        text: String,
        fail: bool,
    }

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<Completion, ProviderError> {
            if self.fail {
                return Err(ProviderError::Network("unreachable".into()));
            }
            Ok(Completion {
                text: self.text.clone(),
                model: "fixed".into(),
                usage: None,
            })
        }
    }

    fn test_router(completion: &str, fail: bool) -> Router {
        let agent = Arc::new(ChatAgent::new(
            Arc::new(FixedProvider {
                text: completion.into(),
                fail,
            }),
            "test-model",
            0.5,
            CapabilityRegistry::new(),
            ConversationStore::new(4),
            4,
        ));
        build_router(agent)
    }

    async fn post_chat(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_router(TAGGED_REPLY, false);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_user_id_is_bad_request() {
        let app = test_router(TAGGED_REPLY, false);
        let (status, json) = post_chat(app, serde_json::json!({"message": "Hello"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Missing required parameters.");
    }

    #[tokio::test]
    async fn message_runs_a_turn() {
        let app = test_router(TAGGED_REPLY, false);
        let (status, json) =
            post_chat(app, serde_json::json!({"userId": "u1", "message": "Hello"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Welcome! What are you eating tonight? 🍷");
        assert_eq!(json["command"], "None");
        assert_eq!(json["feelings"], "warm");
    }

    #[tokio::test]
    async fn reply_without_message_becomes_apology() {
        let app = test_router("<THOUGHT>lost in thought</THOUGHT>", false);
        let (status, json) =
            post_chat(app, serde_json::json!({"userId": "u1", "message": "Hello"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], APOLOGY);
    }

    #[tokio::test]
    async fn provider_failure_becomes_apology_with_502() {
        let app = test_router(TAGGED_REPLY, true);
        let (status, json) =
            post_chat(app, serde_json::json!({"userId": "u1", "message": "Hello"})).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["message"], APOLOGY);
    }

    #[tokio::test]
    async fn command_runs_the_command_path() {
        let app = test_router(TAGGED_REPLY, false);
        let (status, json) = post_chat(
            app,
            serde_json::json!({"userId": "u1", "command": "Search[Riesling]"}),
        )
        .await;

        // No capability registered in this router — the agent still
        // answers, with "Not found" on its screen.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Welcome! What are you eating tonight? 🍷");
    }

    #[tokio::test]
    async fn non_sentinel_command_is_not_executed() {
        let app = test_router(TAGGED_REPLY, false);
        let (status, json) =
            post_chat(app, serde_json::json!({"userId": "u1", "command": "None"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], DONT_UNDERSTAND);
    }

    #[tokio::test]
    async fn nonexistent_prefix_is_also_gated() {
        let app = test_router(TAGGED_REPLY, false);
        let (_, json) = post_chat(
            app,
            serde_json::json!({"userId": "u1", "command": "Nonexistent[x]"}),
        )
        .await;

        assert_eq!(json["message"], DONT_UNDERSTAND);
    }

    #[tokio::test]
    async fn shapeless_command_is_not_executed() {
        let app = test_router(TAGGED_REPLY, false);
        let (_, json) =
            post_chat(app, serde_json::json!({"userId": "u1", "command": "Search"})).await;

        assert_eq!(json["message"], DONT_UNDERSTAND);
    }

    #[tokio::test]
    async fn empty_body_fields_fall_through() {
        let app = test_router(TAGGED_REPLY, false);
        let (_, json) = post_chat(app, serde_json::json!({"userId": "u1"})).await;

        assert_eq!(json["message"], DONT_UNDERSTAND);
    }

    #[tokio::test]
    async fn message_takes_precedence_over_command() {
        let app = test_router(TAGGED_REPLY, false);
        let (_, json) = post_chat(
            app,
            serde_json::json!({
                "userId": "u1",
                "message": "Hello",
                "command": "Search[Riesling]"
            }),
        )
        .await;

        assert_eq!(json["message"], "Welcome! What are you eating tonight? 🍷");
    }
}
