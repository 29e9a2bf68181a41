//! Server provisioning requests.
//!
//! The list endpoint has answered in several shapes over time; every shape
//! is normalized into one `ServerRequestList`.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::servers::attach_file;
use super::{list_request, member_path, ReasonBody};
use crate::api::{ApiClient, ApiError, MultipartPayload, Payload, RequestDescriptor};
use crate::models::{
    CompleteServerRequest, PageParams, Pagination, RequestStatus, ServerRequest,
    ServerRequestList,
};

const SERVER_REQUESTS_PATH: &str = "/admin/server_requests";

/// Keys the list payload has been seen under, in priority order.
const LIST_KEYS: [&str; 4] = ["server_requests", "requests", "data", "items"];

#[derive(Debug, Default, Serialize)]
struct RequestFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<RequestStatus>,
}

pub struct ServerRequestService<'a> {
    client: &'a ApiClient,
}

impl<'a> ServerRequestService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        page: PageParams,
        status: Option<RequestStatus>,
    ) -> Result<ServerRequestList, ApiError> {
        let request = list_request(SERVER_REQUESTS_PATH, page, &RequestFilters { status })?;
        let raw: Value = self.client.send(request).await?.data;
        Ok(normalize_list(&raw, page))
    }

    pub async fn pending(&self, page: PageParams) -> Result<ServerRequestList, ApiError> {
        self.list(page, Some(RequestStatus::Pending)).await
    }

    pub async fn get(&self, id: impl Display) -> Result<ServerRequest, ApiError> {
        let path = member_path(SERVER_REQUESTS_PATH, id, None);
        let raw: Value = self.client.send(RequestDescriptor::get(path)).await?.data;
        normalize_detail(raw)
    }

    pub async fn approve(&self, id: impl Display) -> Result<Value, ApiError> {
        let path = member_path(SERVER_REQUESTS_PATH, id, Some("approve"));
        Ok(self.client.post(&path, Payload::Empty).await?.data)
    }

    /// Reject a request, with an optional reason for the requester.
    pub async fn reject(&self, id: impl Display, reason: Option<&str>) -> Result<Value, ApiError> {
        let path = member_path(SERVER_REQUESTS_PATH, id, Some("reject"));
        let body = match reason {
            Some(reason) => Payload::json(&ReasonBody { reason })?,
            None => Payload::Empty,
        };
        Ok(self.client.post(&path, body).await?.data)
    }

    /// Fulfil a request by provisioning the server described in `data`.
    pub async fn complete(&self, id: impl Display, data: &CompleteServerRequest) -> Result<Value, ApiError> {
        let path = member_path(SERVER_REQUESTS_PATH, id, Some("complete"));
        let config_type = serde_json::to_value(data.config_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let mut form = MultipartPayload::new()
            .text("name", data.name.clone())
            .text("ip_address", data.ip_address.clone())
            .text("config_type", config_type)
            .text("description", data.description.clone());
        form = attach_file(form, "image", data.image.as_ref());
        form = attach_file(form, "config_file", data.config_file.as_ref());

        Ok(self.client.post(&path, Payload::Multipart(form)).await?.data)
    }
}

/// Collapse any known list shape into requests plus pagination.
pub fn normalize_list(raw: &Value, page: PageParams) -> ServerRequestList {
    let (items, paging) = match raw {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(obj) => {
            let items = LIST_KEYS
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_array))
                .map(Vec::as_slice)
                .unwrap_or_default();
            let paging = obj
                .get("pagination")
                .filter(|p| p.is_object())
                .or_else(|| obj.get("meta").filter(|m| m.is_object()));
            (items, paging)
        }
        other => {
            warn!(kind = %type_name(other), "Unexpected server request list payload");
            (&[][..], None)
        }
    };

    let server_requests: Vec<ServerRequest> = items.iter().filter_map(normalize_request).collect();
    let pagination = Pagination::normalize(paging, page.page, server_requests.len(), page.per_page);
    debug!(count = server_requests.len(), total = pagination.total, "Server requests normalized");

    ServerRequestList {
        server_requests,
        pagination,
    }
}

/// Accept a detail response wrapped in `server_request` or bare.
pub fn normalize_detail(raw: Value) -> Result<ServerRequest, ApiError> {
    let inner = match raw {
        Value::Object(mut obj) if obj.contains_key("server_request") => {
            obj.remove("server_request").unwrap_or(Value::Null)
        }
        other => other,
    };
    normalize_request(&inner)
        .ok_or_else(|| ApiError::InvalidResponse("Server request response was empty".to_string()))
}

fn normalize_request(value: &Value) -> Option<ServerRequest> {
    if !value.is_object() {
        return None;
    }
    match serde_json::from_value::<ServerRequest>(value.clone()) {
        Ok(mut request) => {
            if request.requested_at.is_none() {
                request.requested_at = request.created_at.clone();
            }
            Some(request)
        }
        Err(e) => {
            warn!(error = %e, "Skipping malformed server request");
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> PageParams {
        PageParams::new(1, 20)
    }

    #[test]
    fn test_bare_array() {
        let list = normalize_list(&json!([{"id": 1}, {"id": 2}, {"id": 3}]), page());
        assert_eq!(list.server_requests.len(), 3);
        assert_eq!(list.pagination.total, 3);
        assert_eq!(list.pagination.total_pages, 1);
        assert_eq!(list.pagination.current_page, 1);
    }

    #[test]
    fn test_alternate_keys_with_meta() {
        let raw = json!({
            "requests": [{"id": 4, "specifications": "8 GB RAM"}],
            "meta": {"current_page": 2, "total_pages": 5, "total_count": 41}
        });
        let list = normalize_list(&raw, PageParams::new(2, 10));
        assert_eq!(list.server_requests[0].specs, "8 GB RAM");
        assert_eq!(
            list.pagination,
            Pagination {
                total: 41,
                current_page: 2,
                total_pages: 5
            }
        );
    }

    #[test]
    fn test_camel_case_pagination_and_data_key() {
        let raw = json!({
            "data": [{"id": 7, "created_at": "2024-05-01T00:00:00Z"}],
            "pagination": {"totalItems": 12, "currentPage": 1, "totalPages": 2}
        });
        let list = normalize_list(&raw, page());
        let request = &list.server_requests[0];
        assert_eq!(request.requested_at.as_deref(), Some("2024-05-01T00:00:00Z"));
        assert_eq!(list.pagination.total, 12);
        assert_eq!(list.pagination.total_pages, 2);
    }

    #[test]
    fn test_unknown_shapes_become_empty() {
        assert!(normalize_list(&json!({"unexpected": true}), page()).server_requests.is_empty());
        assert!(normalize_list(&json!("nope"), page()).server_requests.is_empty());
        assert!(normalize_list(&json!([1, "x", {"id": 2}]), page()).server_requests.len() == 1);
    }

    #[test]
    fn test_detail_wrapped_or_bare() {
        let wrapped = normalize_detail(json!({"server_request": {"id": 5, "status": "approved"}})).unwrap();
        assert_eq!(wrapped.status, RequestStatus::Approved);

        let bare = normalize_detail(json!({"id": 6, "user": {"name": "Ada", "email": "ada@example.com"}})).unwrap();
        assert_eq!(bare.user.name, "Ada");
        assert_eq!(bare.status, RequestStatus::Pending);

        assert!(normalize_detail(Value::Null).is_err());
    }
}
