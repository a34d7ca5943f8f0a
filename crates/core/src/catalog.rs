use std::collections::BTreeSet;

use crate::model::Course;

/// Category selection in the catalog. `All` disables category filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a UI value; `all` (any case) and blank mean no filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Named(trimmed.to_owned())
        }
    }

    fn matches(&self, course: &Course) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(wanted) => course
                .category()
                .is_some_and(|c| c.trim().to_lowercase() == wanted.trim().to_lowercase()),
        }
    }
}

/// Fetched courses plus the filter state that derives the visible list.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    courses: Vec<Course>,
    categories: Vec<String>,
    selected: CategoryFilter,
    search_query: String,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    pub fn set_category(&mut self, filter: CategoryFilter) {
        self.selected = filter;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn reset_filters(&mut self) {
        self.selected = CategoryFilter::All;
        self.search_query.clear();
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Known categories: the fetched list, or the distinct categories of the
    /// loaded courses when none were fetched.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        if !self.categories.is_empty() {
            return self.categories.clone();
        }
        self.courses
            .iter()
            .filter_map(Course::category)
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Courses matching the selected category and the search text.
    ///
    /// Search is a case-insensitive substring match on title or description.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Course> {
        let needle = self.search_query.trim().to_lowercase();
        self.courses
            .iter()
            .filter(|course| self.selected.matches(course))
            .filter(|course| {
                needle.is_empty()
                    || course.title().to_lowercase().contains(&needle)
                    || course
                        .description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
