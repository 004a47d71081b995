use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trainer_desk::api::{create_routes, AppState};
use trainer_desk::auth::SessionGate;
use trainer_desk::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder, PlanConfig};
use trainer_desk::services::{RosterService, WorkoutPlanService};
use trainer_desk::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = AppConfig::from_env()?;

    // RUST_LOG wins over LOG_LEVEL when both are set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&app_config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db_config = DatabaseConfig::from_env()?;
    let plan_config = PlanConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;
    info!("Database migrations applied");

    if app_config.is_development() {
        DatabaseSeeder::new(pool.clone()).seed_all().await?;
    }

    let store = Arc::new(PgStore::new(pool));
    let state = AppState {
        plan_service: WorkoutPlanService::new(store.clone(), plan_config.clone()),
        roster_service: RosterService::new(store.clone(), store),
        gate: SessionGate::new(&app_config.jwt_secret),
    };

    let app = create_routes(state);

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(
        environment = %app_config.environment,
        weekly_sessions = plan_config.weekly_sessions,
        "Trainer desk server starting on http://{}",
        address
    );
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
