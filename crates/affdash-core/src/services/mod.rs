//! Typed services over the admin API.
//!
//! Each service borrows the shared `ApiClient`, so every call gets bearer
//! injection and refresh-and-retry for free:
//!
//! ```ignore
//! let users = client.users().list(PageParams::default(), &UserFilters::default()).await?;
//! ```

use std::fmt::Display;

use serde::Serialize;

use crate::api::{ApiClient, ApiError, RequestDescriptor};
use crate::models::PageParams;

pub mod admin_roles;
pub mod affiliates;
pub mod auth;
pub mod commissions;
pub mod dashboard;
pub mod server_requests;
pub mod servers;
pub mod users;
pub mod withdrawals;

pub use admin_roles::AdminRoleService;
pub use affiliates::AffiliateService;
pub use auth::AuthService;
pub use commissions::CommissionService;
pub use dashboard::DashboardService;
pub use server_requests::ServerRequestService;
pub use servers::ServerService;
pub use users::UserService;
pub use withdrawals::WithdrawalService;

impl ApiClient {
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn servers(&self) -> ServerService<'_> {
        ServerService::new(self)
    }

    pub fn server_requests(&self) -> ServerRequestService<'_> {
        ServerRequestService::new(self)
    }

    pub fn affiliates(&self) -> AffiliateService<'_> {
        AffiliateService::new(self)
    }

    pub fn commissions(&self) -> CommissionService<'_> {
        CommissionService::new(self)
    }

    pub fn withdrawals(&self) -> WithdrawalService<'_> {
        WithdrawalService::new(self)
    }

    pub fn admin_roles(&self) -> AdminRoleService<'_> {
        AdminRoleService::new(self)
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self)
    }
}

/// GET for a paged list: `page` / `per_page` followed by the set filters.
pub(crate) fn list_request<F>(path: &str, page: PageParams, filters: &F) -> Result<RequestDescriptor, ApiError>
where
    F: Serialize + ?Sized,
{
    RequestDescriptor::get(path).query(&page)?.query(filters)
}

/// `{collection}/{id}` or `{collection}/{id}/{action}`.
pub(crate) fn member_path(collection: &str, id: impl Display, action: Option<&str>) -> String {
    match action {
        Some(action) => format!("{}/{}/{}", collection, id, action),
        None => format!("{}/{}", collection, id),
    }
}

/// Body for reject endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct ReasonBody<'a> {
    pub reason: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserFilters;

    #[test]
    fn test_list_request_orders_paging_first() {
        let filters = UserFilters {
            search: Some("ada".into()),
            ..Default::default()
        };
        let request = list_request("/admin/users", PageParams::new(2, 25), &filters).unwrap();
        assert_eq!(request.query[0], ("page".to_string(), "2".to_string()));
        assert_eq!(request.query[1], ("per_page".to_string(), "25".to_string()));
        assert_eq!(request.query[2], ("search".to_string(), "ada".to_string()));
        assert_eq!(request.query.len(), 3);
    }

    #[test]
    fn test_member_path() {
        assert_eq!(member_path("/admin/commissions", 7, None), "/admin/commissions/7");
        assert_eq!(
            member_path("/admin/commissions", "c-1", Some("release")),
            "/admin/commissions/c-1/release"
        );
    }
}
