use serde::{Deserialize, Serialize};

use super::{Id, PageMeta, Pagination};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ServerType {
    #[default]
    Free,
    Premium,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    #[default]
    Url,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Server {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "ipAddress")]
    pub ip_address: String,
    #[serde(default, alias = "configType")]
    pub config_type: ConfigType,
    #[serde(default)]
    pub server_type: ServerType,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub config_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ServerListResponse {
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ServerDetailResponse {
    pub server: Server,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<ServerType>,
}

/// Server attributes sent as the `server` JSON part of a multipart upload.
#[derive(Debug, Clone, Serialize)]
pub struct ServerFields {
    pub name: String,
    pub ip_address: String,
    pub config_type: ConfigType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_type: Option<ServerType>,
    pub status: ServerStatus,
    pub description: String,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id>,
}

/// A file attached to a multipart upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// Create/update body for a server. `server` may be omitted on update.
#[derive(Debug, Clone, Default)]
pub struct ServerPayload {
    pub server: Option<ServerFields>,
    pub image: Option<FileUpload>,
    pub config_file: Option<FileUpload>,
}

/// Minimal view of the requesting user attached to a server request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RequestUser {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl Default for RequestUser {
    fn default() -> Self {
        Self {
            id: None,
            name: unknown_name(),
            email: String::new(),
            profile_image: None,
        }
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// A user's request for a dedicated server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ServerRequest {
    #[serde(default)]
    pub id: Id,
    #[serde(default, alias = "specifications")]
    pub specs: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub requested_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub user: RequestUser,
    #[serde(default)]
    pub server: Option<Server>,
}

impl ServerRequest {
    /// When the request was made, falling back to its creation time.
    pub fn requested_at(&self) -> Option<&str> {
        self.requested_at.as_deref().or(self.created_at.as_deref())
    }
}

/// Normalized server request list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ServerRequestList {
    pub server_requests: Vec<ServerRequest>,
    pub pagination: Pagination,
}

/// Fields sent when fulfilling a server request.
#[derive(Debug, Clone)]
pub struct CompleteServerRequest {
    pub name: String,
    pub ip_address: String,
    pub config_type: ConfigType,
    pub description: String,
    pub image: Option<FileUpload>,
    pub config_file: Option<FileUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_accepts_camel_case_fields() {
        let server: Server = serde_json::from_str(
            r#"{"id": 3, "name": "edge-1", "ipAddress": "10.0.0.3", "configType": "file"}"#,
        )
        .unwrap();
        assert_eq!(server.ip_address, "10.0.0.3");
        assert_eq!(server.config_type, ConfigType::File);
        assert_eq!(server.status, ServerStatus::Active);
    }

    #[test]
    fn test_server_request_defaults() {
        let request: ServerRequest = serde_json::from_str(
            r#"{"id": 9, "specifications": "4 vCPU", "created_at": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(request.specs, "4 vCPU");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.user.name, "Unknown");
        assert_eq!(request.requested_at(), Some("2024-03-01T10:00:00Z"));
    }
}
