use std::fmt::Display;

use serde_json::json;

use super::{list_request, member_path};
use crate::api::{ApiClient, ApiError, Payload, RequestDescriptor};
use crate::models::{
    Device, DevicesResponse, MessageResponse, PageParams, UpdateUserRequest, User, UserFilters,
    UserResponse, UserUpdate, UsersResponse,
};

const USERS_PATH: &str = "/admin/users";

pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: PageParams, filters: &UserFilters) -> Result<UsersResponse, ApiError> {
        let request = list_request(USERS_PATH, page, filters)?;
        Ok(self.client.send(request).await?.data)
    }

    pub async fn get(&self, id: impl Display) -> Result<User, ApiError> {
        let path = member_path(USERS_PATH, id, None);
        let response: UserResponse = self.client.send(RequestDescriptor::get(path)).await?.data;
        Ok(response.user)
    }

    pub async fn update(&self, id: impl Display, update: UserUpdate) -> Result<User, ApiError> {
        let path = member_path(USERS_PATH, id, None);
        let body = Payload::json(&UpdateUserRequest { user: update })?;
        let response: UserResponse = self.client.put(&path, body).await?.data;
        Ok(response.user)
    }

    pub async fn update_password(&self, id: impl Display, password: &str) -> Result<MessageResponse, ApiError> {
        let path = member_path(USERS_PATH, id, Some("update_password"));
        let body = Payload::Json(json!({ "user": { "password": password } }));
        Ok(self.client.post(&path, body).await?.data)
    }

    pub async fn devices(&self, id: impl Display) -> Result<Vec<Device>, ApiError> {
        let path = member_path(USERS_PATH, id, Some("devices"));
        let response: DevicesResponse = self.client.send(RequestDescriptor::get(path)).await?.data;
        Ok(response.devices)
    }

    pub async fn remove_device(
        &self,
        user_id: impl Display,
        device_id: impl Display,
    ) -> Result<Option<MessageResponse>, ApiError> {
        let path = format!("{}/devices/{}", member_path(USERS_PATH, user_id, None), device_id);
        Ok(self.client.delete(&path).await?.data)
    }
}
