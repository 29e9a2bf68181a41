//! Data models for the admin backend.
//!
//! This module contains the wire types used by the services:
//!
//! - `AdminUser`, `AuthResponse`: login/refresh payloads
//! - `User`, `Device`: end-user accounts
//! - `Server`, `ServerRequest`: VPN servers and provisioning requests
//! - `Affiliate`, `AffiliateApplication`, `Commission`, `WithdrawalRequest`
//! - `AdminRole`: back-office accounts and permissions
//! - Dashboard aggregates: `DashboardStats`, `GraphData`, `AffiliateStats`, `AffiliateTree`
//! - `PageMeta`, `Pagination`, `PageParams`: list paging

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub mod admin_role;
pub mod affiliate;
pub mod auth;
pub mod commission;
pub mod dashboard;
pub mod pagination;
pub mod server;
pub mod user;
pub mod withdrawal;

pub use admin_role::{
    AdminRole, AdminRoleFields, AdminRoleFilters, AdminRoleResponse, AdminRolesResponse,
    AvailablePermissionsResponse, CreateAdminRoleRequest, UpdateAdminRoleRequest,
};
pub use affiliate::{
    Affiliate, AffiliateApplication, AffiliatesResponse, ApplicationResponse,
    ApplicationStatus, ApplicationsResponse, PersonSummary,
};
pub use auth::{AdminUser, AuthResponse, LoginRequest, RefreshTokenRequest};
pub use commission::{
    Commission, CommissionFilters, CommissionResponse, CommissionStatus, CommissionsResponse,
};
pub use dashboard::{
    AffiliateStats, AffiliateTree, AffiliateTreeNode, DashboardStats, GraphData, GraphPeriod,
    RecentApplication, StatsTotals, TopAffiliate,
};
pub use pagination::{PageMeta, PageParams, Pagination};
pub use server::{
    CompleteServerRequest, ConfigType, FileUpload, RequestStatus, Server, ServerDetailResponse,
    ServerFields, ServerFilters, ServerListResponse, ServerPayload, ServerRequest,
    ServerRequestList, ServerStatus, ServerType, Visibility,
};
pub use user::{
    Device, DevicesResponse, UpdateUserRequest, User, UserFilters, UserResponse, UserUpdate,
    UsersResponse,
};
pub use withdrawal::{
    WithdrawalActionResponse, WithdrawalDetailResponse, WithdrawalFilters, WithdrawalListResponse,
    WithdrawalRequest, WithdrawalStatus,
};

/// Record identifier. The backend uses numeric ids for some resources and
/// UUID strings for others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Text(String),
}

impl Default for Id {
    fn default() -> Self {
        Id::Num(0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Num(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Accepts amounts sent either as JSON numbers or as decimal strings.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Num(f64),
        Text(String),
        Null(()),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Num(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", s))),
        Amount::Null(()) => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wallet {
        #[serde(default, deserialize_with = "lenient_f64")]
        balance: f64,
    }

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_str(r#"[42, "0e65066c-ab20"]"#).unwrap();
        assert_eq!(ids[0], Id::Num(42));
        assert_eq!(ids[1].to_string(), "0e65066c-ab20");
    }

    #[test]
    fn test_lenient_amounts() {
        let w: Wallet = serde_json::from_str(r#"{"balance": "125.50"}"#).unwrap();
        assert_eq!(w.balance, 125.5);
        let w: Wallet = serde_json::from_str(r#"{"balance": 10}"#).unwrap();
        assert_eq!(w.balance, 10.0);
        let w: Wallet = serde_json::from_str(r#"{"balance": null}"#).unwrap();
        assert_eq!(w.balance, 0.0);
        let w: Wallet = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(w.balance, 0.0);
        assert!(serde_json::from_str::<Wallet>(r#"{"balance": "lots"}"#).is_err());
    }
}
