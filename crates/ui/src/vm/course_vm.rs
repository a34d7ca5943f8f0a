use skillforge_core::model::Course;
use url::Url;

use crate::vm::time_fmt::format_price;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseDetailVm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub instructor: Option<String>,
    pub price_label: String,
    pub image_url: Option<String>,
    pub enrolled: bool,
}

impl CourseDetailVm {
    #[must_use]
    pub fn new(course: &Course, enrolled: bool) -> Self {
        Self {
            id: course.id().as_str().to_owned(),
            title: course.title().to_owned(),
            description: course
                .description()
                .unwrap_or("No description yet.")
                .to_owned(),
            category: course.category().map(str::to_owned),
            instructor: course.instructor().map(str::to_owned),
            price_label: format_price(course.price()),
            image_url: course.image_url().map(ToString::to_string),
            enrolled,
        }
    }
}

/// Checkout session id carried in a checkout URL.
///
/// Hosted checkout pages put the session id (`cs_...`) as a path segment;
/// the id is what payment verification needs once the user comes back.
#[must_use]
pub fn checkout_session_id(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "session_id")
        .map(|(_, value)| value.into_owned());
    from_query.or_else(|| {
        url.path_segments()?
            .filter(|segment| segment.starts_with("cs_"))
            .last()
            .map(str::to_owned)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_from_hosted_checkout_path() {
        let url = Url::parse("https://checkout.stripe.com/c/pay/cs_test_a1B2#fidkdWxOYHwn").unwrap();
        assert_eq!(checkout_session_id(&url).as_deref(), Some("cs_test_a1B2"));
    }

    #[test]
    fn session_id_from_query_wins() {
        let url = Url::parse("https://pay.example.com/return?session_id=cs_9").unwrap();
        assert_eq!(checkout_session_id(&url).as_deref(), Some("cs_9"));
        let url = Url::parse("https://pay.example.com/checkout").unwrap();
        assert_eq!(checkout_session_id(&url), None);
    }

    #[test]
    fn offline_checkout_url_carries_an_id() {
        let url = Url::parse("memory://checkout/cs_offline_rust-101").unwrap();
        assert_eq!(
            checkout_session_id(&url).as_deref(),
            Some("cs_offline_rust-101")
        );
    }
}
