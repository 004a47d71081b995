// Business logic services

pub mod roster_service;
pub mod workout_plan_service;

pub use roster_service::RosterService;
pub use workout_plan_service::WorkoutPlanService;
