use serde::Serialize;
use skillforge_core::model::{CourseId, Payment};
use url::Url;

use super::HttpRepository;
use super::mapping::{checkout_url_from, enrollment_from, payments_from, verification_from};
use crate::repository::{EnrollmentRepository, StorageError};

#[derive(Debug, Serialize)]
struct VerifyBody<'a> {
    session_id: &'a str,
}

#[async_trait::async_trait]
impl EnrollmentRepository for HttpRepository {
    async fn is_enrolled(&self, course_id: &CourseId) -> Result<bool, StorageError> {
        let request = self.get(&format!("payment/check-enrollment/{course_id}"))?;
        enrollment_from(self.send(request).await?)
    }

    async fn create_checkout_session(&self, course_id: &CourseId) -> Result<Url, StorageError> {
        let request = self.get(&format!("payment/checkout-session/{course_id}"))?;
        checkout_url_from(self.send(request).await?)
    }

    async fn verify_payment(&self, session_id: &str) -> Result<bool, StorageError> {
        let request = self
            .post("payment/verify-payment")?
            .json(&VerifyBody { session_id });
        Ok(verification_from(self.send(request).await?))
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, StorageError> {
        let request = self.get("payment/my-payments")?;
        payments_from(self.send(request).await?, self.base_url())
    }
}
