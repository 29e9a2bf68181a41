use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::{list_request, member_path, ReasonBody};
use crate::api::{ApiClient, ApiError, Payload, RequestDescriptor};
use crate::models::{
    AffiliateApplication, AffiliatesResponse, ApplicationResponse, ApplicationStatus,
    ApplicationsResponse, PageParams,
};

const APPLICATIONS_PATH: &str = "/admin/affiliate-applications";
const AFFILIATES_PATH: &str = "/admin/affiliates";

#[derive(Debug, Default, Serialize)]
struct ApplicationFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ApplicationStatus>,
}

pub struct AffiliateService<'a> {
    client: &'a ApiClient,
}

impl<'a> AffiliateService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn applications(
        &self,
        page: PageParams,
        status: Option<ApplicationStatus>,
    ) -> Result<ApplicationsResponse, ApiError> {
        let request = list_request(APPLICATIONS_PATH, page, &ApplicationFilters { status })?;
        Ok(self.client.send(request).await?.data)
    }

    pub async fn application(&self, id: impl Display) -> Result<AffiliateApplication, ApiError> {
        let path = member_path(APPLICATIONS_PATH, id, None);
        let response: ApplicationResponse = self.client.send(RequestDescriptor::get(path)).await?.data;
        Ok(response.into_application())
    }

    /// Approve an application. The backend answers with the new affiliate.
    pub async fn approve(&self, id: impl Display) -> Result<Value, ApiError> {
        let path = member_path(APPLICATIONS_PATH, id, Some("approve"));
        Ok(self.client.post(&path, Payload::Empty).await?.data)
    }

    pub async fn reject(&self, id: impl Display, reason: &str) -> Result<Value, ApiError> {
        let path = member_path(APPLICATIONS_PATH, id, Some("reject"));
        let body = Payload::json(&ReasonBody { reason })?;
        Ok(self.client.post(&path, body).await?.data)
    }

    pub async fn list(&self, page: PageParams) -> Result<AffiliatesResponse, ApiError> {
        let request = list_request(AFFILIATES_PATH, page, &())?;
        Ok(self.client.send(request).await?.data)
    }
}
