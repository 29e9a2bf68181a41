//! Login, logout and token refresh for the admin account.

use serde_json::Value;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, Payload, RequestDescriptor};
use crate::auth::{AuthState, SessionData};
use crate::models::{AdminUser, AuthResponse, LoginRequest};

const LOGIN_PATH: &str = "/admin/login";
const LOGOUT_PATH: &str = "/admin/logout";

pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session and persist it.
    ///
    /// Sent without a bearer token; a 401 here means bad credentials and is
    /// returned as-is rather than starting a refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionData, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = RequestDescriptor::post(LOGIN_PATH)
            .payload(Payload::json(&body)?)
            .anonymous();

        let auth: AuthResponse = self.client.send(request).await?.data;
        if auth.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "Login response did not contain a token".to_string(),
            ));
        }

        let session = SessionData::from_auth(auth);
        self.client.session().save(&session)?;
        info!(email = %email, "Logged in");
        self.client.publish(AuthState::Authenticated);
        Ok(session)
    }

    /// Rotate the token pair now instead of waiting for a 401.
    pub async fn refresh(&self) -> Result<SessionData, ApiError> {
        self.client.refresh_session().await
    }

    /// Tell the backend (best effort) and clear the local session regardless.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if self.is_authenticated()? {
            let request = RequestDescriptor::delete(LOGOUT_PATH);
            if let Err(e) = self.client.send_once::<Value>(request).await {
                warn!(error = %e, "Logout request failed, clearing local session anyway");
            }
        }

        self.client.session().clear()?;
        self.client.publish(AuthState::LoggedOut);
        info!("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.client.session().token()?.is_some())
    }

    /// Profile cached at login.
    pub fn current_user(&self) -> Result<Option<AdminUser>, ApiError> {
        Ok(self.client.session().load()?.and_then(|s| s.user))
    }
}
