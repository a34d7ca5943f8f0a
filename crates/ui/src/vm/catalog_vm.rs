use skillforge_core::catalog::{CatalogStore, CategoryFilter};
use skillforge_core::model::Course;

use crate::vm::time_fmt::format_price;

/// Value of the "all categories" option in the category select.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseCardVm {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub instructor: Option<String>,
    pub price_label: String,
    pub image_url: Option<String>,
}

impl CourseCardVm {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id().as_str().to_owned(),
            title: course.title().to_owned(),
            category: course.category().map(str::to_owned),
            instructor: course.instructor().map(str::to_owned),
            price_label: format_price(course.price()),
            image_url: course.image_url().map(ToString::to_string),
        }
    }
}

#[must_use]
pub fn map_course_cards(store: &CatalogStore) -> Vec<CourseCardVm> {
    store
        .filtered()
        .into_iter()
        .map(CourseCardVm::from_course)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryOptionVm {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Options for the category select, "All" first.
#[must_use]
pub fn category_options(store: &CatalogStore) -> Vec<CategoryOptionVm> {
    let selected = store.selected_category();
    let mut options = vec![CategoryOptionVm {
        value: ALL_CATEGORIES.to_owned(),
        label: "All categories".to_owned(),
        selected: *selected == CategoryFilter::All,
    }];
    options.extend(store.categories().into_iter().map(|name| CategoryOptionVm {
        selected: matches!(selected, CategoryFilter::Named(n) if n.eq_ignore_ascii_case(&name)),
        value: name.clone(),
        label: name,
    }));
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillforge_core::model::CourseId;

    fn store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.set_courses(vec![
            Course::new(CourseId::new("1").unwrap(), "Rust")
                .unwrap()
                .with_category("Programming")
                .with_price(19.0),
            Course::new(CourseId::new("2").unwrap(), "Watercolor")
                .unwrap()
                .with_category("Art"),
        ]);
        store
    }

    #[test]
    fn cards_follow_the_category_filter() {
        let mut store = store();
        store.set_category(CategoryFilter::parse("art"));
        let cards = map_course_cards(&store);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Watercolor");
        assert_eq!(cards[0].price_label, "Free");
    }

    #[test]
    fn selected_category_is_marked() {
        let mut store = store();
        store.set_category(CategoryFilter::parse("Programming"));
        let options = category_options(&store);
        assert_eq!(options[0].value, ALL_CATEGORIES);
        assert!(!options[0].selected);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Programming");
    }
}
