use skillforge_core::model::UserProfile;

use super::HttpRepository;
use super::mapping::{grant_parts, profile_from};
use crate::repository::{AuthGrant, AuthRepository, Credentials, NewAccount, StorageError};

impl HttpRepository {
    /// Store the token and fill in the profile when the response omitted it.
    async fn finish_grant(
        &self,
        body: serde_json::Value,
        email: &str,
    ) -> Result<AuthGrant, StorageError> {
        let (token, profile) = grant_parts(body)?;
        self.token.set(Some(token.clone()));
        let profile = match profile {
            Some(profile) => profile,
            None => self
                .current_profile()
                .await
                .unwrap_or_else(|_| UserProfile::new(None, Some(email.to_owned()))),
        };
        Ok(AuthGrant { token, profile })
    }
}

#[async_trait::async_trait]
impl AuthRepository for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, StorageError> {
        let request = self.post("user/login")?.json(credentials);
        let body = self.send(request).await?;
        self.finish_grant(body, &credentials.email).await
    }

    async fn signup(&self, account: &NewAccount) -> Result<AuthGrant, StorageError> {
        let request = self.post("user/signup")?.json(account);
        let body = self.send(request).await?;
        self.finish_grant(body, &account.email).await
    }

    async fn current_profile(&self) -> Result<UserProfile, StorageError> {
        if !self.token.is_present() {
            return Err(StorageError::Unauthorized);
        }
        let body = self.send(self.get("user/me")?).await?;
        profile_from(body)
    }
}
