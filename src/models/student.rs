use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::assessment::Assessment;
use crate::models::payment::Payment;
use crate::models::workout_assignment::WorkoutAssignment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: StudentStatus,
    pub goal: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything the student page shows at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetails {
    pub student: Student,
    /// Current plan in position order.
    pub plan: Vec<WorkoutAssignment>,
    /// Oldest first.
    pub assessments: Vec<Assessment>,
    /// Newest first.
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Overdue,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(StudentStatus::Active),
            "inactive" => Ok(StudentStatus::Inactive),
            "overdue" => Ok(StudentStatus::Overdue),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Roster search: case-insensitive substring over name or email, plus an optional status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub status: Option<StudentStatus>,
}

impl StudentFilter {
    pub fn matches(&self, student: &Student) -> bool {
        if let Some(status) = self.status {
            if student.status != status {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                student.name.to_lowercase().contains(&term)
                    || student
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&term))
            }
        }
    }
}
