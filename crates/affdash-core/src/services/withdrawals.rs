use std::fmt::Display;

use super::{list_request, member_path, ReasonBody};
use crate::api::{ApiClient, ApiError, Payload, RequestDescriptor};
use crate::models::{
    PageParams, WithdrawalActionResponse, WithdrawalDetailResponse, WithdrawalFilters,
    WithdrawalListResponse, WithdrawalRequest,
};

const WITHDRAWALS_PATH: &str = "/admin/withdrawal-requests";

pub struct WithdrawalService<'a> {
    client: &'a ApiClient,
}

impl<'a> WithdrawalService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        page: PageParams,
        filters: &WithdrawalFilters,
    ) -> Result<WithdrawalListResponse, ApiError> {
        let request = list_request(WITHDRAWALS_PATH, page, filters)?;
        Ok(self.client.send(request).await?.data)
    }

    pub async fn get(&self, id: impl Display) -> Result<WithdrawalRequest, ApiError> {
        let path = member_path(WITHDRAWALS_PATH, id, None);
        let response: WithdrawalDetailResponse =
            self.client.send(RequestDescriptor::get(path)).await?.data;
        Ok(response.withdrawal_request)
    }

    pub async fn approve(&self, id: impl Display) -> Result<WithdrawalActionResponse, ApiError> {
        self.action(id, "approve", Payload::Empty).await
    }

    pub async fn reject(&self, id: impl Display, reason: &str) -> Result<WithdrawalActionResponse, ApiError> {
        self.action(id, "reject", Payload::json(&ReasonBody { reason })?).await
    }

    /// Mark an approved withdrawal as paid out.
    pub async fn complete(&self, id: impl Display) -> Result<WithdrawalActionResponse, ApiError> {
        self.action(id, "complete", Payload::Empty).await
    }

    async fn action(
        &self,
        id: impl Display,
        action: &str,
        payload: Payload,
    ) -> Result<WithdrawalActionResponse, ApiError> {
        let path = member_path(WITHDRAWALS_PATH, id, Some(action));
        Ok(self.client.post(&path, payload).await?.data)
    }
}
