//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, InMemoryFeedbackAdapter, LopdfPageExtractor, OpenAiGenerationAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState, SESSION_HEADER},
};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, Method,
    },
    Router,
};
use smart_city_core::ports::FeedbackRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const IN_MEMORY_DATABASE: &str = "memory://";

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Feedback Store ---
    let feedback_repository: Arc<dyn FeedbackRepository> =
        if config.database_url == IN_MEMORY_DATABASE {
            warn!("Using the in-memory feedback store; records will not survive a restart.");
            Arc::new(InMemoryFeedbackAdapter::new())
        } else {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&config.database_url)
                .await
                .map_err(ApiError::DatabaseConnect)?;
            let db_adapter = DbAdapter::new(db_pool, config.feedback_table.clone());
            info!("Ensuring feedback schema...");
            db_adapter
                .ensure_schema()
                .await
                .map_err(|source| ApiError::Schema {
                    table: config.feedback_table.clone(),
                    source,
                })?;
            Arc::new(db_adapter)
        };

    // --- 3. Initialize Service Adapters ---
    let generator = Arc::new(OpenAiGenerationAdapter::from_config(&config.generation));
    info!(
        model = %config.generation.model,
        base_url = %config.generation.base_url,
        "Generation endpoint configured."
    );
    let page_extractor = Arc::new(LopdfPageExtractor::new());

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(generator, page_extractor, feedback_repository));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, HeaderName::from_static(SESSION_HEADER)]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state, config.max_upload_bytes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| ApiError::Bind {
            address: config.bind_address.to_string(),
            source,
        })?;
    axum::serve(listener, app).await?;

    Ok(())
}
