use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Id, PageMeta};

/// Permission name -> granted.
pub type AdminRolePermissions = BTreeMap<String, bool>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AdminRole {
    pub id: Id,
    #[serde(default)]
    pub user_id: Option<Id>,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub role_type: String,
    #[serde(default)]
    pub permissions: AdminRolePermissions,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AdminRole {
    pub fn granted_permissions(&self) -> Vec<&str> {
        self.permissions
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AdminRolesResponse {
    #[serde(default)]
    pub admin_roles: Vec<AdminRole>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AdminRoleResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub admin_role: AdminRole,
}

/// Fields for create (all required by the backend) and update (all optional).
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminRoleFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<AdminRolePermissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAdminRoleRequest {
    pub admin_role: AdminRoleFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAdminRoleRequest {
    pub admin_role: AdminRoleFields,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminRoleFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl AdminRoleFilters {
    /// Accepts `active` as typed in a filter box (`"true"` / `"false"`).
    pub fn parse_active(mut self, active: &str) -> Self {
        self.active = match active.trim() {
            "" => None,
            other => Some(other.eq_ignore_ascii_case("true")),
        };
        self
    }
}

/// Role type -> default permission set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AvailablePermissionsResponse {
    #[serde(default)]
    pub permissions: HashMap<String, AdminRolePermissions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_permissions_sorted() {
        let role: AdminRole = serde_json::from_str(
            r#"{"id": "r1", "role_type": "support", "active": true,
                "permissions": {"users.write": false, "users.read": true, "commissions.read": true}}"#,
        )
        .unwrap();
        assert_eq!(role.granted_permissions(), vec!["commissions.read", "users.read"]);
    }

    #[test]
    fn test_parse_active_filter() {
        assert_eq!(AdminRoleFilters::default().parse_active("true").active, Some(true));
        assert_eq!(AdminRoleFilters::default().parse_active("false").active, Some(false));
        assert_eq!(AdminRoleFilters::default().parse_active("").active, None);
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let body = serde_json::to_value(UpdateAdminRoleRequest {
            admin_role: AdminRoleFields {
                active: Some(false),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"admin_role": {"active": false}}));
    }
}
