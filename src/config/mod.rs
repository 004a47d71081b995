// Environment-driven configuration

pub mod app;
pub mod database;
pub mod plan;
pub mod seeding;

pub use app::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
pub use plan::PlanConfig;
pub use seeding::DatabaseSeeder;
