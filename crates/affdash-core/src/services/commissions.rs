use std::fmt::Display;

use super::{list_request, member_path, ReasonBody};
use crate::api::{ApiClient, ApiError, Payload, RequestDescriptor};
use crate::models::{CommissionFilters, CommissionResponse, CommissionsResponse, PageParams};

const COMMISSIONS_PATH: &str = "/admin/commissions";

pub struct CommissionService<'a> {
    client: &'a ApiClient,
}

impl<'a> CommissionService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        page: PageParams,
        filters: &CommissionFilters,
    ) -> Result<CommissionsResponse, ApiError> {
        let request = list_request(COMMISSIONS_PATH, page, filters)?;
        Ok(self.client.send(request).await?.data)
    }

    pub async fn get(&self, id: impl Display) -> Result<CommissionResponse, ApiError> {
        let path = member_path(COMMISSIONS_PATH, id, None);
        Ok(self.client.send(RequestDescriptor::get(path)).await?.data)
    }

    pub async fn approve(&self, id: impl Display) -> Result<CommissionResponse, ApiError> {
        self.action(id, "approve", Payload::Empty).await
    }

    /// Release an approved commission to the affiliate's wallet.
    pub async fn release(&self, id: impl Display) -> Result<CommissionResponse, ApiError> {
        self.action(id, "release", Payload::Empty).await
    }

    pub async fn reject(&self, id: impl Display, reason: &str) -> Result<CommissionResponse, ApiError> {
        self.action(id, "reject", Payload::json(&ReasonBody { reason })?).await
    }

    async fn action(
        &self,
        id: impl Display,
        action: &str,
        payload: Payload,
    ) -> Result<CommissionResponse, ApiError> {
        let path = member_path(COMMISSIONS_PATH, id, Some(action));
        Ok(self.client.post(&path, payload).await?.data)
    }
}
