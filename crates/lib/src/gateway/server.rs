//! Gateway HTTP server: Twilio WhatsApp webhook and health probe.

use crate::channels::{strip_transport_prefix, InboundMessage, MessageSender, TwilioWhatsApp};
use crate::config::{self, Config, TwilioCredentials};
use crate::dispatch::{Dispatcher, ReplyTable};
use crate::gateway::protocol::{
    Health, WebhookForm, EMPTY_TWIML_RESPONSE, TWIML_CONTENT_TYPE,
};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use std::sync::Arc;

/// Path Twilio is configured to POST incoming WhatsApp messages to.
pub const WEBHOOK_PATH: &str = "/api/whatsapp/webhook";

/// Shared, read-only state for request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
}

impl GatewayState {
    pub fn new(config: Config, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(Arc::new(ReplyTable::default()), sender),
        }
    }
}

/// Per-request failure. Logged and answered with a bare 500.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("invalid webhook form: {0}")]
    Form(#[from] FormRejection),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        log::error!("error processing request: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Build the HTTP router for the given state.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route(WEBHOOK_PATH, post(whatsapp_webhook))
        .with_state(state)
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Fails before binding when any Twilio credential is missing. Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let credentials = config::resolve_credentials(&config)?;
    run_gateway_with_credentials(config, credentials).await
}

/// Like [`run_gateway`] but with credentials already resolved.
pub async fn run_gateway_with_credentials(
    config: Config,
    credentials: TwilioCredentials,
) -> Result<()> {
    log::debug!("using twilio credentials {:?}", credentials);
    let whatsapp = TwilioWhatsApp::new(credentials, config.twilio.api_base.clone())
        .context("building twilio client")?;
    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let state = GatewayState::new(config, Arc::new(whatsapp));
    log::info!(
        "reply table loaded with {} menu option(s)",
        state.dispatcher.table().len()
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /api/whatsapp/webhook — Twilio form (Body, From); replies via the REST API, acknowledges with empty TwiML.
/// The acknowledgment does not depend on whether the outbound send succeeded.
async fn whatsapp_webhook(
    State(state): State<GatewayState>,
    form: Result<Form<WebhookForm>, FormRejection>,
) -> Result<Response, WebhookError> {
    let Form(form) = form?;
    let inbound = InboundMessage {
        sender: strip_transport_prefix(&form.from),
        body: form.body,
    };
    log::info!("received '{}' from {}", inbound.body.trim(), inbound.sender);

    let reply = state
        .dispatcher
        .dispatch(&inbound.sender, &inbound.body)
        .await;
    log::info!("reply to {}: {}", inbound.sender, reply);

    Ok((
        [(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)],
        EMPTY_TWIML_RESPONSE,
    )
        .into_response())
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<Health> {
    Json(Health {
        runtime: "running".to_string(),
        port: state.config.gateway.port,
    })
}
