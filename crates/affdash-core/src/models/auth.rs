use serde::{Deserialize, Serialize};

use super::Id;

/// Profile of the signed-in admin, cached alongside the tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AdminUser {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role_type: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl AdminUser {
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Body returned by the login and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<AdminUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut user: AdminUser = serde_json::from_str(
            r#"{"id": "u-1", "email": "ops@example.com", "first_name": "Ada", "last_name": "Ops"}"#,
        )
        .expect("valid user");
        assert_eq!(user.display_name(), "Ada Ops");

        user.first_name = None;
        user.last_name = None;
        assert_eq!(user.display_name(), "ops@example.com");

        user.name = Some("Ada Lovelace".into());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }
}
