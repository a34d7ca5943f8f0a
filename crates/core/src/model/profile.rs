use serde::{Deserialize, Serialize};

/// Name used on a certificate when the profile has neither name nor email.
pub const FALLBACK_STUDENT_NAME: &str = "Student";

/// Signed-in user as reported by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(display_name: Option<String>, email: Option<String>) -> Self {
        Self {
            display_name: display_name.filter(|n| !n.trim().is_empty()),
            email: email.filter(|e| !e.trim().is_empty()),
        }
    }

    /// Name to print: display name, then email, then a generic label.
    #[must_use]
    pub fn certificate_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(FALLBACK_STUDENT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_name_falls_back() {
        let named = UserProfile::new(Some("Ada".into()), Some("ada@example.com".into()));
        assert_eq!(named.certificate_name(), "Ada");

        let email_only = UserProfile::new(Some(" ".into()), Some("ada@example.com".into()));
        assert_eq!(email_only.certificate_name(), "ada@example.com");

        let empty = UserProfile::new(None, None);
        assert_eq!(empty.certificate_name(), FALLBACK_STUDENT_NAME);
    }
}
