use std::fmt::Display;

use super::{list_request, member_path};
use crate::api::{ApiClient, ApiError, Payload, RequestDescriptor};
use crate::models::{
    AdminRole, AdminRoleFields, AdminRoleFilters, AdminRoleResponse, AdminRolesResponse,
    AvailablePermissionsResponse, CreateAdminRoleRequest, MessageResponse, PageParams,
    UpdateAdminRoleRequest,
};

const ADMIN_ROLES_PATH: &str = "/admin/admin_roles";

pub struct AdminRoleService<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminRoleService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        page: PageParams,
        filters: &AdminRoleFilters,
    ) -> Result<AdminRolesResponse, ApiError> {
        let request = list_request(ADMIN_ROLES_PATH, page, filters)?;
        Ok(self.client.send(request).await?.data)
    }

    pub async fn get(&self, id: impl Display) -> Result<AdminRole, ApiError> {
        let path = member_path(ADMIN_ROLES_PATH, id, None);
        let response: AdminRoleResponse = self.client.send(RequestDescriptor::get(path)).await?.data;
        Ok(response.admin_role)
    }

    /// Create an admin account together with its role.
    pub async fn create(&self, fields: AdminRoleFields) -> Result<AdminRoleResponse, ApiError> {
        let body = Payload::json(&CreateAdminRoleRequest { admin_role: fields })?;
        Ok(self.client.post(ADMIN_ROLES_PATH, body).await?.data)
    }

    pub async fn update(&self, id: impl Display, fields: AdminRoleFields) -> Result<AdminRoleResponse, ApiError> {
        let path = member_path(ADMIN_ROLES_PATH, id, None);
        let body = Payload::json(&UpdateAdminRoleRequest { admin_role: fields })?;
        Ok(self.client.put(&path, body).await?.data)
    }

    /// Remove a role; `delete_user` also removes the underlying account.
    pub async fn delete(&self, id: impl Display, delete_user: bool) -> Result<Option<MessageResponse>, ApiError> {
        let path = member_path(ADMIN_ROLES_PATH, id, None);
        let request = RequestDescriptor::delete(path).query(&[("delete_user", delete_user)])?;
        Ok(self.client.send(request).await?.data)
    }

    /// Default permission set per role type.
    pub async fn available_permissions(&self) -> Result<AvailablePermissionsResponse, ApiError> {
        let path = format!("{}/available_permissions", ADMIN_ROLES_PATH);
        Ok(self.client.send(RequestDescriptor::get(path)).await?.data)
    }
}
