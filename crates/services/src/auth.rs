use std::sync::{Arc, RwLock};

use skillforge_core::model::UserProfile;
use storage::repository::{AuthRepository, Credentials, NewAccount, SessionToken, StorageError};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::events::{AuthEvent, EventBus};

/// Who is signed in, shared by every service that calls the API.
///
/// The token slot is the same one the storage adapters read, so clearing it
/// here signs out every subsequent request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: SessionToken,
    profile: Arc<RwLock<Option<UserProfile>>>,
    events: EventBus,
}

impl SessionContext {
    #[must_use]
    pub fn new(token: SessionToken, events: EventBus) -> Self {
        Self {
            token,
            profile: Arc::new(RwLock::new(None)),
            events,
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token.is_present()
    }

    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().ok().and_then(|guard| guard.clone())
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn sign_in(&self, token: String, profile: UserProfile) {
        self.token.set(Some(token));
        self.set_profile(Some(profile.clone()));
        self.events.publish(AuthEvent::SignedIn(profile));
    }

    fn set_profile(&self, profile: Option<UserProfile>) {
        if let Ok(mut guard) = self.profile.write() {
            *guard = profile;
        }
    }

    /// Forget the token and profile and tell listeners.
    pub fn sign_out(&self) {
        self.token.clear();
        self.set_profile(None);
        self.events.publish(AuthEvent::SignedOut);
    }

    /// Inspect a storage failure; an expired session signs the user out.
    pub fn note_error(&self, err: &StorageError) {
        if matches!(err, StorageError::Unauthorized) && self.profile().is_some() {
            warn!("session rejected by the API, signing out");
            self.sign_out();
        } else if matches!(err, StorageError::Unauthorized) {
            self.token.clear();
        }
    }
}

/// Login, signup and profile lookups on behalf of the UI.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthRepository>,
    session: SessionContext,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthRepository>, session: SessionContext) -> Self {
        Self { auth, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` for blank input,
    /// `AuthError::InvalidCredentials` when the API refuses them, or
    /// `AuthError::Storage` if the request fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let credentials = Credentials {
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        let grant = self.auth.login(&credentials).await.map_err(|err| match err {
            StorageError::Unauthorized => AuthError::InvalidCredentials,
            other => AuthError::from(other),
        })?;
        info!(email = %credentials.email, "signed in");
        self.session.sign_in(grant.token, grant.profile.clone());
        Ok(grant.profile)
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` for blank input,
    /// `AuthError::AlreadyRegistered` for a taken email, or
    /// `AuthError::Storage` if the request fails.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let account = NewAccount {
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        let grant = self.auth.signup(&account).await?;
        info!(email = %account.email, "account created");
        self.session.sign_in(grant.token, grant.profile.clone());
        Ok(grant.profile)
    }

    pub fn logout(&self) {
        self.session.sign_out();
    }

    /// Fetch the signed-in profile from the API.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SignedOut` when the session is missing or expired;
    /// the session is cleared in that case.
    pub async fn refresh_profile(&self) -> Result<UserProfile, AuthError> {
        match self.auth.current_profile().await {
            Ok(profile) => {
                self.session.set_profile(Some(profile.clone()));
                Ok(profile)
            }
            Err(err) => {
                self.session.note_error(&err);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn service(repo: &InMemoryRepository) -> AuthService {
        let session = SessionContext::new(SessionToken::default(), EventBus::new());
        AuthService::new(Arc::new(repo.clone()), session)
    }

    #[tokio::test]
    async fn login_stores_token_and_announces_it() {
        let repo = InMemoryRepository::new();
        repo.register_account(
            "ada@example.com",
            "pw",
            UserProfile::new(Some("Ada".into()), None),
        )
        .unwrap();
        let auth = service(&repo);
        let mut events = auth.session().events().subscribe();

        let profile = auth.login(" ada@example.com ", "pw").await.unwrap();
        assert_eq!(profile.certificate_name(), "Ada");
        assert!(auth.session().is_signed_in());
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::SignedIn(_)));

        auth.logout();
        assert!(!auth.session().is_signed_in());
        assert!(auth.session().profile().is_none());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
    }

    #[tokio::test]
    async fn bad_credentials_are_reported_as_such() {
        let auth = service(&InMemoryRepository::new());
        assert!(matches!(
            auth.login("x@example.com", "pw").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("", "pw").await,
            Err(AuthError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn expired_session_signs_out_on_refresh() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        auth.signup("Ada", "ada@example.com", "pw").await.unwrap();
        let mut events = auth.session().events().subscribe();

        repo.set_current_profile(None).unwrap();
        assert!(matches!(
            auth.refresh_profile().await,
            Err(AuthError::SignedOut)
        ));
        assert!(!auth.session().is_signed_in());
        assert_eq!(events.recv().await.unwrap(), AuthEvent::SignedOut);
    }
}
