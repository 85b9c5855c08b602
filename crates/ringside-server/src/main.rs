use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod testing;

use adapters::{BroadcastPublisher, InMemoryCallRepository, VapiClient};
use application::{CallOrchestrator, CallSessionService, FallbackPoller};
use auth::ApiKeyAuth;
use config::ServerConfig;
use ringside::{AssistantConfigurator, CallStatusSource, Dialer};
use services::FunctionCallHandler;

/// Type aliases for application services with concrete repository implementations
pub type AppCallOrchestrator = CallOrchestrator<InMemoryCallRepository>;
pub type AppSessionService = CallSessionService<InMemoryCallRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AppCallOrchestrator>,
    pub broadcaster: BroadcastPublisher,
    pub functions: FunctionCallHandler,
    pub auth: ApiKeyAuth,
}

/// Wire the services around one provider implementation
pub fn assemble_state<P>(
    provider: Arc<P>,
    broadcaster: BroadcastPublisher,
    poll_delay: Duration,
    phone_number_id: Option<String>,
    auth: ApiKeyAuth,
) -> AppState
where
    P: AssistantConfigurator + Dialer + CallStatusSource + 'static,
{
    let sessions: Arc<AppSessionService> = Arc::new(CallSessionService::new(
        Arc::new(InMemoryCallRepository::new()),
        Arc::new(broadcaster.clone()),
    ));
    let poller = FallbackPoller::new(sessions.clone(), provider.clone(), poll_delay);
    let orchestrator = CallOrchestrator::new(sessions, poller, provider.clone(), provider)
        .with_phone_number_id(phone_number_id);

    AppState {
        orchestrator: Arc::new(orchestrator),
        broadcaster,
        functions: FunctionCallHandler::new(),
        auth,
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Ringside API is running - calls are being watched".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication when a key is configured)
    let protected_routes = routes::call::router().layer(middleware::from_fn_with_state(
        state.auth.clone(),
        auth::auth_middleware,
    ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .merge(routes::webhook::router())
        .merge(routes::realtime::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ringside_server=info,tower_http=info"));
    // Already set when the platform installed its own subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    init_tracing();
    tracing::info!("📞 Ringside API initializing...");

    let config = ServerConfig::from_lookup(|key| secrets.get(key))
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let auth = ApiKeyAuth::new(config.api_key.clone());
    if auth.is_enabled() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No RINGSIDE_API_KEY set - authentication disabled");
    }

    let provider = Arc::new(
        VapiClient::new(config.vapi()).map_err(|e| anyhow::anyhow!("Vapi client: {e}"))?,
    );
    tracing::info!(base_url = %config.vapi_base_url, model = %config.vapi_model, "🎙️  Vapi client initialized");

    if config.vapi_phone_number_id.is_none() {
        tracing::warn!("⚠️  No VAPI_PHONE_NUMBER_ID set - first account number will be used");
    }

    let state = assemble_state(
        provider,
        BroadcastPublisher::new(config.broadcast_capacity),
        config.poll_delay,
        config.vapi_phone_number_id.clone(),
        auth,
    );

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("📡 Realtime channel: /ws");
    tracing::info!("✅ Ringside API ready");

    Ok(router.into())
}
