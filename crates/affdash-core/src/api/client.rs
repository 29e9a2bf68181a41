//! API client for the admin backend.
//!
//! `ApiClient` attaches the stored bearer token to every call and recovers
//! from an expired access token by exchanging the refresh token once and
//! replaying the original request. When that fails the session is cleared
//! and observers are told to send the user to the login entry point.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::auth::{AuthState, SessionData, SessionStore};
use crate::config::Config;
use crate::models::{AuthResponse, RefreshTokenRequest};

use super::{ApiError, Payload, RequestDescriptor};

/// Token exchange endpoint, relative to the versioned base URL.
const REFRESH_PATH: &str = "/admin/refresh";

/// Replays allowed after a successful refresh. A second 401 ends the session.
const MAX_AUTH_RETRIES: u32 = 1;

/// Parsed success body together with the HTTP status.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub data: T,
}

/// API client for the admin backend.
/// Clone is cheap; clones share the connection pool, session store,
/// refresh lock and auth-state channel.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    login_path: String,
    session: Arc<dyn SessionStore>,
    refresh_lock: Arc<Mutex<()>>,
    auth_state: Arc<watch::Sender<AuthState>>,
}

impl ApiClient {
    /// Create a client for the configured backend using the given session store.
    pub fn new(config: &Config, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .default_headers(default_headers)
            .build()?;

        let initial = match session.token() {
            Ok(Some(_)) => AuthState::Authenticated,
            Ok(None) => AuthState::Unknown,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                AuthState::Unknown
            }
        };
        let (auth_state, _) = watch::channel(initial);

        Ok(Self {
            client,
            base_url: config.base_url(),
            login_path: config.login_path.clone(),
            session,
            refresh_lock: Arc::new(Mutex::new(())),
            auth_state: Arc::new(auth_state),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// The session store shared with this client.
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Watch authentication state changes, including "login required".
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_state.subscribe()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state.borrow().clone()
    }

    pub(crate) fn publish(&self, state: AuthState) {
        debug!(?state, "Auth state changed");
        self.auth_state.send_replace(state);
    }

    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(RequestDescriptor::get(path).query(query)?).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(RequestDescriptor::post(path).payload(payload)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(RequestDescriptor::put(path).payload(payload)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.send(RequestDescriptor::delete(path)).await
    }

    /// Issue a request, refreshing the access token and replaying once on 401.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<ApiResponse<T>, ApiError> {
        if request.anonymous {
            let response = self.dispatch(&request, None).await?;
            return Self::parse(response, &request).await;
        }

        let mut attempt: u32 = 0;
        loop {
            let token = self.session.token()?;
            let err = match self.dispatch(&request, token.as_deref()).await {
                Ok(response) => return Self::parse(response, &request).await,
                Err(err) if err.is_unauthorized() => err,
                Err(err) => return Err(err),
            };

            if attempt >= MAX_AUTH_RETRIES {
                warn!(
                    method = %request.method,
                    path = %request.path,
                    "Request rejected again after token refresh"
                );
                return Err(self.expire_session(err));
            }

            if let Err(refresh_err) = self.refresh_after(token.as_deref()).await {
                return Err(self.expire_session(refresh_err));
            }
            attempt += 1;
            debug!(method = %request.method, path = %request.path, attempt, "Replaying request");
        }
    }

    /// Issue a request once with the stored token and no refresh on 401.
    pub(crate) async fn send_once<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<ApiResponse<T>, ApiError> {
        let token = self.session.token()?;
        let response = self.dispatch(&request, token.as_deref()).await?;
        Self::parse(response, &request).await
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// On failure the session is cleared and `SessionExpired` is returned.
    pub async fn refresh_session(&self) -> Result<SessionData, ApiError> {
        let current = self.session.token()?;
        match self.refresh_after(current.as_deref()).await {
            Ok(session) => Ok(session),
            Err(err) => Err(self.expire_session(err)),
        }
    }

    /// Single-flight refresh.
    ///
    /// `stale_token` is the access token the rejected attempt carried. If the
    /// store holds a different token by the time the lock is acquired,
    /// another request already rotated the pair and it is reused as-is.
    async fn refresh_after(&self, stale_token: Option<&str>) -> Result<SessionData, ApiError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.session.load()?;
        if let Some(session) = &current {
            if !session.token.is_empty() && Some(session.token.as_str()) != stale_token {
                debug!("Token already rotated by a concurrent request");
                return Ok(session.clone());
            }
        }

        let current = current
            .filter(SessionData::has_refresh_token)
            .ok_or(ApiError::MissingRefreshToken)?;

        let auth = self.exchange_refresh_token(&current.refresh_token).await?;
        let refreshed = current.rotated(auth);
        self.session.save(&refreshed)?;

        info!("Access token refreshed");
        self.publish(AuthState::Authenticated);
        Ok(refreshed)
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        let request = RequestDescriptor::post(REFRESH_PATH)
            .payload(Payload::json(&body)?)
            .anonymous();

        let response = self.dispatch(&request, None).await?;
        let auth: ApiResponse<AuthResponse> = Self::parse(response, &request).await?;
        if auth.data.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "Refresh response did not contain a token".to_string(),
            ));
        }
        Ok(auth.data)
    }

    /// Clear the session, tell observers to go to login, and wrap the cause.
    fn expire_session(&self, cause: ApiError) -> ApiError {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        warn!(error = %cause, login_path = %self.login_path, "Session expired, login required");
        self.publish(AuthState::LoginRequired {
            login_path: self.login_path.clone(),
        });
        ApiError::SessionExpired {
            login_path: self.login_path.clone(),
            cause: Box::new(cause),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(&request.path);
        debug!(method = %request.method, url = %url, "API request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.effective_headers());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Multipart(form) => builder.multipart(form.to_form()?),
        };

        let response = builder.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            ApiError::NetworkError(e)
        })?;
        debug!(url = %url, status = %response.status(), "API response");

        Self::check_response(response).await
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let url = response.url().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, status = %status, error = %e, "Failed to read error response body");
                String::new()
            }
        };
        let error = ApiError::from_status(status, &body);
        if let Some(body) = error.body() {
            warn!(url = %url, status = %status, body = %body.raw, "API request rejected");
        } else {
            warn!(url = %url, status = %status, "API request rejected");
        }
        Err(error)
    }

    /// Decode a success body. An empty body decodes as JSON `null`.
    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        request: &RequestDescriptor,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        let parsed = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        let data = parsed.map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse response from {} {}: {}",
                request.method, request.path, e
            ))
        })?;
        Ok(ApiResponse { status, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStore;

    fn client_with(session: MemorySessionStore) -> ApiClient {
        let config = Config {
            api_url: "http://localhost:4000/".into(),
            ..Config::default()
        };
        ApiClient::new(&config, Arc::new(session)).unwrap()
    }

    #[test]
    fn test_url_joins_relative_paths() {
        let client = client_with(MemorySessionStore::new());
        assert_eq!(client.url("/admin/users"), "http://localhost:4000/api/v1/admin/users");
        assert_eq!(client.url("admin/users"), "http://localhost:4000/api/v1/admin/users");
    }

    #[test]
    fn test_initial_auth_state_follows_store() {
        let client = client_with(MemorySessionStore::new());
        assert_eq!(client.auth_state(), AuthState::Unknown);

        let client = client_with(MemorySessionStore::with_session(SessionData::new("A", "R1")));
        assert_eq!(client.auth_state(), AuthState::Authenticated);
    }

    #[test]
    fn test_expire_session_clears_and_notifies() {
        let client = client_with(MemorySessionStore::with_session(SessionData::new("A", "R1")));
        let mut rx = client.subscribe();

        let err = client.expire_session(ApiError::MissingRefreshToken);

        assert!(client.session().load().unwrap().is_none());
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            AuthState::LoginRequired {
                login_path: "/login".into()
            }
        );
        match err {
            ApiError::SessionExpired { login_path, cause } => {
                assert_eq!(login_path, "/login");
                assert!(matches!(*cause, ApiError::MissingRefreshToken));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
