//! In-memory working copy of one student's plan.
//!
//! The editor is opened with the exercise catalog, collects an ordered list of draft
//! assignments and produces the validated rows for a replace-all commit. It never talks
//! to the store itself; `WorkoutPlanService` drives loading and committing.
//!
//! Lifecycle: `Open -> Editing -> (Cancelled | Committed)`. Both terminal states close
//! the editor and every further mutation fails with [`EditorError::Closed`].

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::exercise::{muscle_groups, sort_catalog, CatalogFilter, Exercise};
use crate::models::workout_assignment::{
    normalize_notes, NewWorkoutAssignment, DEFAULT_REPS, DEFAULT_REST_SECONDS, DEFAULT_SETS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    Open,
    Editing,
    Cancelled,
    Committed,
}

impl EditorState {
    pub fn is_closed(self) -> bool {
        matches!(self, EditorState::Cancelled | EditorState::Committed)
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("editor is closed ({0:?})")]
    Closed(EditorState),
    #[error("a plan needs at least one exercise")]
    EmptyPlan,
    #[error("exercise {0} is not in the catalog")]
    UnknownExercise(Uuid),
    #[error("assignment #{index} is invalid: {source}")]
    InvalidDraft {
        index: usize,
        #[source]
        source: ValidationErrors,
    },
}

/// Draft assignment as edited before commit. Numeric fields hold whatever the caller
/// entered; they are only checked when the submission is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftAssignment {
    pub exercise: Exercise,
    pub sets: i32,
    pub reps: i32,
    pub rest_seconds: i32,
    pub notes: String,
}

impl DraftAssignment {
    pub fn new(exercise: &Exercise) -> Self {
        Self {
            exercise: exercise.clone(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            rest_seconds: DEFAULT_REST_SECONDS,
            notes: String::new(),
        }
    }

    pub fn exercise_id(&self) -> Uuid {
        self.exercise.id
    }

    fn apply(&mut self, field: DraftField) {
        match field {
            DraftField::Sets(v) => self.sets = v,
            DraftField::Reps(v) => self.reps = v,
            DraftField::RestSeconds(v) => self.rest_seconds = v,
            DraftField::Notes(v) => self.notes = v,
        }
    }

    fn to_row(&self, weekly_sessions: i32) -> NewWorkoutAssignment {
        NewWorkoutAssignment {
            exercise_id: self.exercise.id,
            sets: self.sets,
            reps: self.reps,
            rest_seconds: self.rest_seconds,
            weekly_sessions,
            notes: normalize_notes(&self.notes),
        }
    }
}

/// Single editable field of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Sets(i32),
    Reps(i32),
    RestSeconds(i32),
    Notes(String),
}

#[derive(Debug, Clone)]
pub struct WorkoutPlanEditor {
    student_id: Uuid,
    catalog: Vec<Exercise>,
    filter: CatalogFilter,
    selected: Vec<DraftAssignment>,
    state: EditorState,
}

impl WorkoutPlanEditor {
    pub fn new(student_id: Uuid, mut catalog: Vec<Exercise>) -> Self {
        sort_catalog(&mut catalog);
        Self {
            student_id,
            catalog,
            filter: CatalogFilter::All,
            selected: Vec::new(),
            state: EditorState::Open,
        }
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn catalog(&self) -> &[Exercise] {
        &self.catalog
    }

    pub fn muscle_groups(&self) -> Vec<String> {
        muscle_groups(&self.catalog)
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    /// Narrows `visible_catalog`. Never re-queries the store.
    pub fn set_filter(&mut self, filter: CatalogFilter) {
        self.filter = filter;
    }

    pub fn visible_catalog(&self) -> Vec<&Exercise> {
        self.filter.apply(&self.catalog)
    }

    pub fn selected(&self) -> &[DraftAssignment] {
        &self.selected
    }

    /// Appends a draft with default sets, reps and rest. The same exercise may appear
    /// any number of times. Returns the index of the new draft.
    pub fn add_exercise(&mut self, exercise: &Exercise) -> Result<usize, EditorError> {
        self.ensure_open()?;
        self.selected.push(DraftAssignment::new(exercise));
        self.state = EditorState::Editing;
        Ok(self.selected.len() - 1)
    }

    pub fn add_exercise_by_id(&mut self, exercise_id: Uuid) -> Result<usize, EditorError> {
        let exercise = self
            .catalog
            .iter()
            .find(|e| e.id == exercise_id)
            .cloned()
            .ok_or(EditorError::UnknownExercise(exercise_id))?;
        self.add_exercise(&exercise)
    }

    /// Removes the draft at `index`. An index past the end changes nothing and yields `None`.
    pub fn remove_exercise(&mut self, index: usize) -> Result<Option<DraftAssignment>, EditorError> {
        self.ensure_open()?;
        if index >= self.selected.len() {
            return Ok(None);
        }
        self.state = EditorState::Editing;
        Ok(Some(self.selected.remove(index)))
    }

    /// Sets one field of the draft at `index`. Returns `false` when no such draft exists.
    pub fn update_field(&mut self, index: usize, field: DraftField) -> Result<bool, EditorError> {
        self.ensure_open()?;
        match self.selected.get_mut(index) {
            Some(draft) => {
                draft.apply(field);
                self.state = EditorState::Editing;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn can_commit(&self) -> bool {
        !self.state.is_closed() && !self.selected.is_empty()
    }

    /// Builds the rows that replace the student's plan, stamping every row with
    /// `weekly_sessions`. Nothing is written here; an empty or invalid draft list is
    /// refused before any store call can be made.
    pub fn submission(&self, weekly_sessions: i32) -> Result<Vec<NewWorkoutAssignment>, EditorError> {
        self.ensure_open()?;
        if self.selected.is_empty() {
            return Err(EditorError::EmptyPlan);
        }

        self.selected
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let row = draft.to_row(weekly_sessions);
                row.validate()
                    .map_err(|source| EditorError::InvalidDraft { index, source })?;
                Ok(row)
            })
            .collect()
    }

    /// Discards the working copy.
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        self.ensure_open()?;
        self.selected.clear();
        self.state = EditorState::Cancelled;
        Ok(())
    }

    pub(crate) fn mark_committed(&mut self) {
        self.state = EditorState::Committed;
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.state.is_closed() {
            return Err(EditorError::Closed(self.state));
        }
        Ok(())
    }
}
