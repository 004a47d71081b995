// Data model and the workout plan editor

pub mod assessment;
pub mod dashboard;
pub mod exercise;
pub mod payment;
pub mod student;
pub mod workout_assignment;
pub mod workout_plan;

pub use assessment::*;
pub use dashboard::*;
pub use exercise::*;
pub use payment::*;
pub use student::*;
pub use workout_assignment::*;
pub use workout_plan::*;
