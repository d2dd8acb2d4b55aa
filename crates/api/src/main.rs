mod config;
mod middleware;
mod response;
mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use config::Config;
use middleware::AppState;
use std::net::SocketAddr;
use std::time::Duration;
use ticketline_core::PgInventoryRepository;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Budget for a single request's database work, checked by the booking
/// engine before each OCC attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ticketline API server...");

    let cfg = Config::from_env()?;

    // Initialize database pool
    let pool = ticketline_db::create_pool(&cfg.database_url).await?;
    ticketline_db::run_migrations(&pool).await?;

    tracing::info!("database connection established");

    let state = AppState {
        db: pool.clone(),
        repo: PgInventoryRepository::new(pool),
        jwt_secret: cfg.jwt_secret,
        request_timeout: REQUEST_TIMEOUT,
    };

    // Build application router
    let app = Router::new()
        .route("/health", get(health_check))
        // Auth routes
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        // Event routes
        .route("/events", get(routes::events::list_events))
        .route("/events/:id", get(routes::events::get_event))
        .route("/events/:id/book", post(routes::bookings::book_event))
        // Booking routes
        .route("/bookings", get(routes::bookings::list_my_bookings))
        .route(
            "/bookings/:id/cancel",
            post(routes::bookings::cancel_booking_route),
        )
        // Admin routes
        .route("/admin/events", post(routes::admin::create_event))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server exited gracefully");

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down server...");
}
