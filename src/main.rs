//! Chantier Planning server entry point.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderValue;
use chrono::Local;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chantier_planning::adapters::http::{app_router, PlanningHandlers, VoiceProxyState};
use chantier_planning::adapters::store::{demo_store, InMemoryRecordStore};
use chantier_planning::adapters::{StaticSessionProvider, WebhookConfig, WebhookVoiceAssistant};
use chantier_planning::application::handlers::planning::{
    CreateAssignmentHandler, DeleteInterventionHandler, HandleDropHandler, MoveAssignmentHandler,
    PlanningContext, PlanningQueries, RefreshScheduleCommand, RefreshScheduleHandler,
    SubmitVoiceNoteHandler, UpdateSelectionHandler,
};
use chantier_planning::config::{AppConfig, ServerConfig};
use chantier_planning::domain::foundation::{CommandMetadata, Profile, TenantScope, UserId};
use chantier_planning::domain::planning::PlanningFilter;
use chantier_planning::ports::SessionProvider;

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal(context: Arc<PlanningContext>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
    context.close();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    // Session and tenant
    let tenant = config.planning.tenant_id.unwrap_or_default();
    let user_id = UserId::new(config.planning.user_id.clone())?;
    let session = StaticSessionProvider::new(Profile::new(user_id.clone(), tenant));
    let profile = session
        .current_profile()
        .await?
        .ok_or("no signed-in profile")?;
    let scope = TenantScope::for_profile(&profile);

    // Store
    let today = Local::now().date_naive();
    let store = Arc::new(if config.planning.seed_demo_data {
        demo_store(scope.tenant_id(), today)
    } else {
        InMemoryRecordStore::new()
    });

    // Planning engine
    let context = Arc::new(PlanningContext::new(scope, PlanningFilter::new(today)));
    let refresh = Arc::new(RefreshScheduleHandler::new(
        store.clone(),
        store.clone(),
        store.clone(),
        context.clone(),
    ));
    let create = Arc::new(CreateAssignmentHandler::new(store.clone(), context.clone()));
    let move_assignment = Arc::new(MoveAssignmentHandler::new(
        store.clone(),
        refresh.clone(),
        context.clone(),
    ));
    let drop_handler = Arc::new(HandleDropHandler::new(create, move_assignment));
    let delete = Arc::new(DeleteInterventionHandler::new(store.clone(), context.clone()));
    let selection = Arc::new(UpdateSelectionHandler::new(context.clone()));
    let queries = Arc::new(PlanningQueries::new(context.clone()));

    let loaded = refresh
        .handle(
            RefreshScheduleCommand,
            CommandMetadata::new(user_id.clone()).with_source("startup"),
        )
        .await?;
    tracing::info!(
        tenant_id = %context.scope().tenant_id(),
        job_sites = loaded.job_sites,
        workers = loaded.workers,
        interventions = loaded.interventions,
        "schedule loaded"
    );

    let mut planning = PlanningHandlers::new(
        user_id,
        drop_handler,
        delete,
        refresh.clone(),
        selection,
        queries,
    );

    // Voice assistant
    let voice_proxy = match &config.voice.webhook_url {
        Some(url) => {
            let webhook = WebhookConfig::new(url.clone()).with_timeout(config.voice.timeout());
            let assistant = Arc::new(WebhookVoiceAssistant::new(webhook)?);
            planning = planning.with_voice(Arc::new(SubmitVoiceNoteHandler::new(
                assistant,
                refresh,
                context.clone(),
            )));
            let client = reqwest::Client::builder()
                .timeout(config.voice.timeout())
                .build()?;
            tracing::info!(webhook_url = %url, "voice assistant enabled");
            Some(VoiceProxyState::new(client, url.clone()))
        }
        None => {
            tracing::info!("voice assistant disabled");
            None
        }
    };

    let app = app_router(planning, voice_proxy)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(context))
        .await?;

    Ok(())
}
