use anyhow::{ensure, Context, Result};
use std::env;
use std::time::Duration;

use crate::models::DEFAULT_WEEKLY_SESSIONS;

/// Settings of the workout plan commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfig {
    /// Stamped on every committed assignment.
    pub weekly_sessions: i32,
    pub commit_max_attempts: u32,
    /// Linear backoff unit between attempts.
    pub commit_backoff: Duration,
    /// Upper bound for a single replace call.
    pub commit_timeout: Duration,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            weekly_sessions: DEFAULT_WEEKLY_SESSIONS,
            commit_max_attempts: 3,
            commit_backoff: Duration::from_millis(200),
            commit_timeout: Duration::from_secs(10),
        }
    }
}

impl PlanConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            weekly_sessions: parse_var("PLAN_WEEKLY_SESSIONS")?.unwrap_or(defaults.weekly_sessions),
            commit_max_attempts: parse_var("PLAN_COMMIT_MAX_ATTEMPTS")?
                .unwrap_or(defaults.commit_max_attempts),
            commit_backoff: parse_var("PLAN_COMMIT_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.commit_backoff),
            commit_timeout: parse_var("PLAN_COMMIT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.commit_timeout),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=7).contains(&self.weekly_sessions),
            "PLAN_WEEKLY_SESSIONS must be between 1 and 7, got {}",
            self.weekly_sessions
        );
        ensure!(
            self.commit_max_attempts >= 1,
            "PLAN_COMMIT_MAX_ATTEMPTS must be at least 1"
        );
        ensure!(
            !self.commit_timeout.is_zero(),
            "PLAN_COMMIT_TIMEOUT_SECS must be positive"
        );
        Ok(())
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {name}: {value:?}")),
        Err(_) => Ok(None),
    }
}
