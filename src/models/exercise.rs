use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog entry a workout assignment refers to. Maintained outside the plan editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
    pub description: Option<String>,
}

/// A filtered view of the catalog together with every category it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogPage {
    pub exercises: Vec<Exercise>,
    /// Independent of the filter, so the category picker never shrinks.
    pub muscle_groups: Vec<String>,
}

/// Local category filter over an already loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogFilter {
    #[default]
    All,
    MuscleGroup(String),
}

impl CatalogFilter {
    /// Parse a query value; a missing, blank or `all` value means no filtering.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => CatalogFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => CatalogFilter::All,
            Some(v) => CatalogFilter::MuscleGroup(v.to_string()),
        }
    }

    pub fn matches(&self, exercise: &Exercise) -> bool {
        match self {
            CatalogFilter::All => true,
            CatalogFilter::MuscleGroup(group) => exercise.muscle_group == *group,
        }
    }

    pub fn apply<'a>(&self, catalog: &'a [Exercise]) -> Vec<&'a Exercise> {
        catalog.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Order a catalog the way the store returns it: by muscle group, then name.
pub fn sort_catalog(catalog: &mut [Exercise]) {
    catalog.sort_by(|a, b| {
        a.muscle_group
            .cmp(&b.muscle_group)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Distinct muscle groups present in the catalog, sorted.
pub fn muscle_groups(catalog: &[Exercise]) -> Vec<String> {
    let mut groups: Vec<String> = catalog.iter().map(|e| e.muscle_group.clone()).collect();
    groups.sort();
    groups.dedup();
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn exercise(n: u128, name: &str, group: &str) -> Exercise {
        Exercise {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            muscle_group: group.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_filter_from_query() {
        assert_eq!(CatalogFilter::from_query(None), CatalogFilter::All);
        assert_eq!(CatalogFilter::from_query(Some("  ")), CatalogFilter::All);
        assert_eq!(CatalogFilter::from_query(Some("ALL")), CatalogFilter::All);
        assert_eq!(
            CatalogFilter::from_query(Some("Chest")),
            CatalogFilter::MuscleGroup("Chest".to_string())
        );
    }

    #[test]
    fn test_filter_apply() {
        let catalog = vec![
            exercise(1, "Bench", "Chest"),
            exercise(2, "Squat", "Legs"),
            exercise(3, "Fly", "Chest"),
        ];

        let chest = CatalogFilter::MuscleGroup("Chest".to_string()).apply(&catalog);
        assert_eq!(chest.len(), 2);
        assert!(chest.iter().all(|e| e.muscle_group == "Chest"));
        assert_eq!(CatalogFilter::All.apply(&catalog).len(), 3);
    }

    #[test]
    fn test_sort_catalog_and_groups() {
        let mut catalog = vec![
            exercise(1, "Squat", "Legs"),
            exercise(2, "Fly", "Chest"),
            exercise(3, "Bench", "Chest"),
        ];
        sort_catalog(&mut catalog);

        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bench", "Fly", "Squat"]);
        assert_eq!(muscle_groups(&catalog), vec!["Chest", "Legs"]);
    }
}
