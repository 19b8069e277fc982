//! Storefront REST API client.
//!
//! JSON over HTTP with bearer authentication. A `401` triggers exactly one token refresh; if
//! the refresh fails the session is cleared and callers get [`ApiError::SessionExpired`].

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, debug_span, info, warn};
use uuid::Uuid;

pub mod catalog;
pub mod pricing;
mod session;

pub use catalog::{CatalogApi, MockCatalogApi, Model, Product, Variant};
pub use pricing::{MockPricingApi, PricingApi};
pub use session::{SecretToken, Session};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const REFRESH_PATH: &str = "auth/refresh";

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or body decoding error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The API answered with a non-2xx status.
    #[error("request failed with status {status}: {message}")]
    UnexpectedResponse { status: StatusCode, message: String },

    /// The response body did not have the expected shape.
    #[error("invalid response payload: {0}")]
    InvalidPayload(String),

    /// Authentication failed and could not be refreshed; the session has been cleared.
    #[error("session expired; log in again")]
    SessionExpired,
}

/// HTTP client for the storefront API.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Mutex<Option<Session>>,
}

impl ApiClient {
    /// Create a new client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, session: Option<Session>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
            session: Mutex::new(session),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session, including any tokens rotated by a refresh.
    pub async fn session(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }

    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.lock().await = session;
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None).await?;

        Ok(response.json().await?)
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(body)?;

        self.send(Method::PUT, path, Some(&body)).await?;

        Ok(())
    }

    /// Sends a request, refreshing the session once on `401`.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let access_token = self.access_token().await;

        let response = self
            .execute(method.clone(), path, body, access_token.as_ref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        let refreshed = self.refresh(access_token.as_ref()).await?;

        let retry = self
            .execute(method, path, body, Some(&refreshed))
            .await?;

        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "request still unauthorized after refresh; clearing session");
            self.set_session(None).await;

            return Err(ApiError::SessionExpired);
        }

        check_status(retry).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        access_token: Option<&SecretToken>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let request_id = Uuid::now_v7();
        let span = debug_span!("api_request", %method, %url, %request_id);

        let mut request = self
            .http
            .request(method, &url)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = access_token {
            request = request.bearer_auth(token.expose());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        async move {
            debug!("sending api request");

            let response = request.send().await?;

            debug!(status = %response.status(), "api response received");

            Ok::<_, ApiError>(response)
        }
        .instrument(span)
        .await
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// `failed` is the access token that was rejected; if another request already rotated
    /// it, the current token is reused instead of refreshing twice.
    async fn refresh(&self, failed: Option<&SecretToken>) -> Result<SecretToken, ApiError> {
        let mut session = self.session.lock().await;

        let Some(current) = session.as_mut() else {
            return Err(ApiError::SessionExpired);
        };

        if failed != Some(&current.access_token) {
            return Ok(current.access_token.clone());
        }

        let Some(refresh_token) = current.refresh_token.clone() else {
            warn!("access token rejected and no refresh token available; clearing session");
            *session = None;

            return Err(ApiError::SessionExpired);
        };

        let body = RefreshRequest {
            refresh_token: refresh_token.expose(),
        };

        let outcome = match self
            .execute(
                Method::POST,
                REFRESH_PATH,
                Some(&serde_json::to_value(&body)?),
                None,
            )
            .await
        {
            Ok(response) if response.status().is_success() => {
                response.json::<RefreshResponse>().await.ok()
            }
            Ok(response) => {
                warn!(status = %response.status(), "token refresh rejected");
                None
            }
            Err(error) => {
                warn!("token refresh failed: {error}");
                None
            }
        };

        match outcome {
            Some(RefreshResponse {
                access_token,
                refresh_token,
            }) if !access_token.is_empty() => {
                info!("access token refreshed");
                current.rotate(access_token.clone(), refresh_token);

                Ok(access_token)
            }
            _ => {
                *session = None;

                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn access_token(&self) -> Option<SecretToken> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();

    Err(ApiError::UnexpectedResponse {
        status,
        message: error_message(&text),
    })
}

/// Pulls a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "error")]
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_err| body.trim().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(alias = "token")]
    access_token: SecretToken,

    #[serde(default)]
    refresh_token: Option<SecretToken>,
}

/// A list response, either bare or wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Enveloped { data: Vec<T> },
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Enveloped { data: items } => items,
        }
    }
}

/// A single-resource response, either bare or wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Single<T> {
    Bare(T),
    Enveloped { data: T },
}

impl<T> Single<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Bare(item) | Self::Enveloped { data: item } => item,
        }
    }
}
