use std::fmt::Display;

use serde_json::Value;
use tracing::info;

use super::{list_request, member_path};
use crate::api::{ApiClient, ApiError, MultipartPayload, Payload, RequestDescriptor};
use crate::models::{
    FileUpload, PageParams, Server, ServerDetailResponse, ServerFilters, ServerListResponse,
    ServerPayload,
};

const SERVERS_PATH: &str = "/admin/servers";

pub struct ServerService<'a> {
    client: &'a ApiClient,
}

impl<'a> ServerService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: PageParams, filters: &ServerFilters) -> Result<ServerListResponse, ApiError> {
        let request = list_request(SERVERS_PATH, page, filters)?;
        Ok(self.client.send(request).await?.data)
    }

    pub async fn get(&self, id: impl Display) -> Result<Server, ApiError> {
        let path = member_path(SERVERS_PATH, id, None);
        let response: ServerDetailResponse = self.client.send(RequestDescriptor::get(path)).await?.data;
        Ok(response.server)
    }

    pub async fn create(&self, payload: &ServerPayload) -> Result<Server, ApiError> {
        let form = server_form(payload)?;
        let response: ServerDetailResponse = self.client.post(SERVERS_PATH, form).await?.data;
        info!(name = %response.server.name, "Server created");
        Ok(response.server)
    }

    pub async fn update(&self, id: impl Display, payload: &ServerPayload) -> Result<Server, ApiError> {
        let path = member_path(SERVERS_PATH, id, None);
        let form = server_form(payload)?;
        let response: ServerDetailResponse = self.client.put(&path, form).await?.data;
        Ok(response.server)
    }

    pub async fn delete(&self, id: impl Display) -> Result<(), ApiError> {
        let path = member_path(SERVERS_PATH, id, None);
        let _: Value = self.client.delete(&path).await?.data;
        Ok(())
    }
}

/// `server` travels as a JSON-encoded text part next to the optional files.
fn server_form(payload: &ServerPayload) -> Result<Payload, ApiError> {
    let mut form = MultipartPayload::new();
    if let Some(server) = &payload.server {
        form = form.json("server", server)?;
    }
    form = attach_file(form, "image", payload.image.as_ref());
    form = attach_file(form, "config_file", payload.config_file.as_ref());
    Ok(Payload::Multipart(form))
}

pub(crate) fn attach_file(form: MultipartPayload, name: &str, file: Option<&FileUpload>) -> MultipartPayload {
    match file {
        Some(file) => form.file(name, file.file_name.clone(), file.mime.clone(), file.bytes.clone()),
        None => form,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MultipartField;
    use crate::models::{ConfigType, ServerFields, ServerStatus, Visibility};

    #[test]
    fn test_server_form_parts() {
        let payload = ServerPayload {
            server: Some(ServerFields {
                name: "edge-1".into(),
                ip_address: "10.0.0.3".into(),
                config_type: ConfigType::File,
                server_type: None,
                status: ServerStatus::Active,
                description: String::new(),
                visibility: Visibility::Public,
                user_id: None,
            }),
            image: None,
            config_file: Some(FileUpload::new("edge-1.ovpn", b"client".to_vec())),
        };

        let Payload::Multipart(form) = server_form(&payload).unwrap() else {
            panic!("expected multipart payload");
        };
        let fields = form.fields();
        assert_eq!(fields.len(), 2);
        match &fields[0] {
            MultipartField::Text { name, value } => {
                assert_eq!(name, "server");
                let json: serde_json::Value = serde_json::from_str(value).unwrap();
                assert_eq!(json["config_type"], "file");
                assert!(json.get("server_type").is_none());
            }
            other => panic!("unexpected field {other:?}"),
        }
        assert!(matches!(&fields[1], MultipartField::File { name, .. } if name == "config_file"));
    }

    #[test]
    fn test_update_without_fields_sends_only_files() {
        let payload = ServerPayload {
            image: Some(FileUpload::new("logo.png", vec![0x89]).with_mime("image/png")),
            ..Default::default()
        };
        let Payload::Multipart(form) = server_form(&payload).unwrap() else {
            panic!("expected multipart payload");
        };
        assert_eq!(form.fields().len(), 1);
    }
}
