use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::store::{AppointmentStore, InMemoryAppointmentStore, SupabaseAppointmentStore};
use appointment_cell::AppointmentState;
use schedule_cell::store::{InMemoryScheduleStore, ScheduleStore, SupabaseScheduleStore};
use schedule_cell::ScheduleService;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_utils::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting veterinary clinic API server");

    // Load configuration
    let config = AppConfig::from_env();

    let (schedule_store, appointment_store): (Arc<dyn ScheduleStore>, Arc<dyn AppointmentStore>) =
        if config.is_configured() {
            let supabase = Arc::new(SupabaseClient::new(&config));
            (
                Arc::new(SupabaseScheduleStore::new(Arc::clone(&supabase))),
                Arc::new(SupabaseAppointmentStore::new(supabase)),
            )
        } else {
            warn!("Supabase is not configured, keeping schedule and appointments in memory");
            (
                Arc::new(InMemoryScheduleStore::new()),
                Arc::new(InMemoryAppointmentStore::new()),
            )
        };

    info!("Clinic timezone: {}", config.clinic_timezone);
    let clock = Arc::new(SystemClock::new(config.clinic_timezone));

    // Create shared state
    let schedule = Arc::new(ScheduleService::new(schedule_store));
    let appointments = Arc::new(AppointmentState::new(Arc::clone(&schedule), appointment_store, clock));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(schedule, appointments)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
