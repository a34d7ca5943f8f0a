use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::repository::{
    AuthRepository, CourseRepository, EnrollmentRepository, ProgressRepository, ReviewRepository,
    SessionToken, Storage, StorageError,
};

mod auth_repo;
mod course_repo;
mod enrollment_repo;
mod mapping;
mod progress_repo;
mod review_repo;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/saas";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("invalid API base URL {raw}: {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Where the learning API lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<String>,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `HttpInitError::InvalidBaseUrl` if `raw` is not an absolute URL.
    pub fn new(raw: &str, token: Option<String>) -> Result<Self, HttpInitError> {
        // A trailing slash keeps relative joins inside the API prefix.
        let normalized = format!("{}/", raw.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|source| HttpInitError::InvalidBaseUrl {
            raw: raw.to_owned(),
            source,
        })?;
        Ok(Self { base_url, token })
    }

    /// Read `SKILLFORGE_API_BASE_URL` and `SKILLFORGE_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError::InvalidBaseUrl` if the configured URL is invalid.
    pub fn from_env() -> Result<Self, HttpInitError> {
        let base =
            env::var("SKILLFORGE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());
        let token = env::var("SKILLFORGE_API_TOKEN").ok();
        Self::new(&base, token)
    }
}

/// REST adapter for the learning API.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
    token: SessionToken,
}

impl HttpRepository {
    /// # Errors
    ///
    /// Returns `HttpInitError::Client` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, token: SessionToken) -> Result<Self, HttpInitError> {
        if config.token.is_some() {
            token.set(config.token.clone());
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) fn get(&self, path: &str) -> Result<RequestBuilder, StorageError> {
        Ok(self.authorized(self.client.get(self.endpoint(path)?)))
    }

    pub(crate) fn post(&self, path: &str) -> Result<RequestBuilder, StorageError> {
        Ok(self.authorized(self.client.post(self.endpoint(path)?)))
    }

    pub(crate) fn patch(&self, path: &str) -> Result<RequestBuilder, StorageError> {
        Ok(self.authorized(self.client.patch(self.endpoint(path)?)))
    }

    pub(crate) fn delete(&self, path: &str) -> Result<RequestBuilder, StorageError> {
        Ok(self.authorized(self.client.delete(self.endpoint(path)?)))
    }

    /// Send a request and return its JSON body.
    ///
    /// A 401 drops the stored token so the next request goes out signed out.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Value, StorageError> {
        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "api response");
        if let Some(err) = status_error(status) {
            if matches!(err, StorageError::Unauthorized) {
                self.token.clear();
            }
            return Err(err);
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

fn status_error(status: StatusCode) -> Option<StorageError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::UNAUTHORIZED => StorageError::Unauthorized,
        StatusCode::NOT_FOUND => StorageError::NotFound,
        StatusCode::CONFLICT => StorageError::Conflict,
        other => StorageError::HttpStatus(other.as_u16()),
    })
}

impl Storage {
    /// Build a `Storage` backed by the learning API.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError` if the HTTP client cannot be created.
    pub fn http(config: &ApiConfig) -> Result<Self, HttpInitError> {
        let token = SessionToken::default();
        let repo = HttpRepository::new(config, token.clone())?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let auth: Arc<dyn AuthRepository> = Arc::new(repo.clone());
        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(repo.clone());
        let reviews: Arc<dyn ReviewRepository> = Arc::new(repo);
        Ok(Self {
            progress,
            courses,
            auth,
            enrollments,
            reviews,
            token,
        })
    }
}
