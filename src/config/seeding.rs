use anyhow::Result;
use sqlx::PgPool;

/// Starter catalog loaded into an empty `exercises` table in development.
const STARTER_CATALOG: &[(&str, &str)] = &[
    ("Bench Press", "Chest"),
    ("Incline Dumbbell Press", "Chest"),
    ("Cable Fly", "Chest"),
    ("Lat Pulldown", "Back"),
    ("Seated Row", "Back"),
    ("Deadlift", "Back"),
    ("Back Squat", "Legs"),
    ("Leg Press", "Legs"),
    ("Romanian Deadlift", "Legs"),
    ("Overhead Press", "Shoulders"),
    ("Lateral Raise", "Shoulders"),
    ("Barbell Curl", "Arms"),
    ("Triceps Pushdown", "Arms"),
    ("Plank", "Core"),
    ("Crunch", "Core"),
];

pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        self.seed_exercises().await?;

        tracing::info!("Database seeding completed!");
        Ok(())
    }

    async fn seed_exercises(&self) -> Result<()> {
        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM exercises")
            .fetch_one(&self.pool)
            .await?;

        if existing > 0 {
            tracing::debug!(existing, "exercise catalog already populated");
            return Ok(());
        }

        for (name, muscle_group) in STARTER_CATALOG {
            sqlx::query("INSERT INTO exercises (name, muscle_group) VALUES ($1, $2)")
                .bind(*name)
                .bind(*muscle_group)
                .execute(&self.pool)
                .await?;
        }

        tracing::info!(count = STARTER_CATALOG.len(), "Seeded exercise catalog");
        Ok(())
    }
}
