//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        chat_llm::OpenAiChatAdapter, db::DbAdapter, nearby::ShopDirectoryLookup,
        tts::OpenAiTtsAdapter,
    },
    config::Config,
    error::ApiError,
    services::{ChatService, CommunityService, FeedbackGenerator},
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        chat::{chat_clear_handler, chat_delete_turn_handler, chat_handler, chat_history_handler},
        community::{
            community_analysis_handler, community_feed_handler,
            community_stats_by_country_handler, community_statistics_handler,
            community_submit_handler,
        },
        journal::{journal_overview_handler, journal_submit_handler},
        middleware::require_auth,
        state::AppState,
        ApiDoc,
    },
};
use async_openai::{
    config::OpenAIConfig,
    types::audio::{SpeechModel, Voice},
    Client,
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let feedback_llm = Arc::new(OpenAiChatAdapter::new(
        openai_client.clone(),
        config.feedback_model.clone(),
    ));
    let chat_llm = Arc::new(OpenAiChatAdapter::new(
        openai_client.clone(),
        config.chat_model.clone(),
    ));

    let tts_voice = match config.tts_voice.to_lowercase().as_str() {
        "alloy" => Voice::Alloy,
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        _ => {
            return Err(ApiError::Internal(format!(
                "Invalid TTS voice specified in config: '{}'",
                config.tts_voice
            )))
        }
    };
    let tts_adapter = Arc::new(OpenAiTtsAdapter::new(
        openai_client.clone(),
        SpeechModel::Tts1,
        tts_voice,
    ));

    let nearby = Arc::new(ShopDirectoryLookup::new(store.clone()));

    // --- 4. Build the Services & Shared AppState ---
    let feedback = FeedbackGenerator::new(feedback_llm.clone());
    let chat = ChatService::new(store.clone(), chat_llm, nearby);
    let community = CommunityService::new(
        store.clone(),
        feedback_llm,
        tts_adapter,
        config.podcast_dir.clone(),
    );

    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
        feedback,
        chat,
        community,
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/journal",
            get(journal_overview_handler).post(journal_submit_handler),
        )
        .route("/chat", post(chat_handler).delete(chat_clear_handler))
        .route("/chat/history", get(chat_history_handler))
        .route("/chat/{posted_at}", delete(chat_delete_turn_handler))
        .route(
            "/community",
            get(community_feed_handler).post(community_submit_handler),
        )
        .route("/community/analysis", get(community_analysis_handler))
        .route("/community/statistics", get(community_statistics_handler))
        .route(
            "/community/stats_by_country",
            get(community_stats_by_country_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
