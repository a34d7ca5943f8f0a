use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::CourseId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,
}

/// A course as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    description: Option<String>,
    category: Option<String>,
    price: Option<f64>,
    image_url: Option<Url>,
    instructor: Option<String>,
}

impl Course {
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(id: CourseId, title: impl Into<String>) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            description: None,
            category: None,
            price: None,
            image_url: None,
            instructor: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category, normalizing the quoting some API rows carry.
    #[must_use]
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        self.category = normalize_category(category.as_ref());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: Url) -> Self {
        self.image_url = Some(url);
        self
    }

    #[must_use]
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.price
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    #[must_use]
    pub fn instructor(&self) -> Option<&str> {
        self.instructor.as_deref()
    }
}

/// Strip one pair of surrounding quotes and unescape `\"`.
///
/// Returns `None` when nothing but whitespace is left.
#[must_use]
pub fn normalize_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    let cleaned = trimmed.replace("\\\"", "\"");
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
