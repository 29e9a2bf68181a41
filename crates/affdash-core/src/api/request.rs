//! Immutable request descriptors.
//!
//! A `RequestDescriptor` captures everything needed to (re)issue a call:
//! method, path, query, payload and per-call options. The client never
//! mutates it, so the same descriptor is replayed verbatim after a token
//! refresh.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// A multipart field. Kept as owned data so the form can be rebuilt for a retry.
#[derive(Debug, Clone)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// A `multipart/form-data` body.
#[derive(Debug, Clone, Default)]
pub struct MultipartPayload {
    fields: Vec<MultipartField>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a field holding a serialized JSON document.
    pub fn json<T: Serialize>(self, name: impl Into<String>, value: &T) -> Result<Self, ApiError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode form field: {}", e)))?;
        Ok(self.text(name, encoded))
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(MultipartField::File {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes,
        });
        self
    }

    pub fn fields(&self) -> &[MultipartField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a fresh reqwest form for one attempt.
    pub(crate) fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for field in &self.fields {
            form = match field {
                MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartField::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        part = part.mime_str(mime).map_err(|e| {
                            ApiError::InvalidRequest(format!("Invalid MIME type {}: {}", mime, e))
                        })?;
                    }
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

impl Payload {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode request body: {}", e)))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// Everything needed to issue (and replay) one API call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the versioned base URL, e.g. `/admin/users`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub payload: Payload,
    pub options: RequestOptions,
    /// Send without credentials and never trigger a token refresh (login).
    pub anonymous: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            payload: Payload::Empty,
            options: RequestOptions::default(),
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters from any serializable struct or map.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        self.query.extend(query_pairs(params)?);
        Ok(self)
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Headers to send with this request, excluding authorization.
    ///
    /// Multipart bodies never carry an explicit content-type: the transport
    /// sets `multipart/form-data` with the boundary it generates.
    pub(crate) fn effective_headers(&self) -> HeaderMap {
        let mut headers = self.options.headers.clone();
        if self.payload.is_multipart() {
            headers.remove(header::CONTENT_TYPE);
        }
        headers.remove(header::AUTHORIZATION);
        headers
    }
}

/// Flatten a serializable value into query pairs.
///
/// Top-level `null` fields are skipped so optional filters can be left unset.
pub fn query_pairs<Q: Serialize + ?Sized>(params: &Q) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(params)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode query: {}", e)))?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| scalar_text(&value).map(|text| (key, text)))
            .collect()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Array(pair) if pair.len() == 2 => {
                    let key = scalar_text(&pair[0]).unwrap_or_default();
                    let value = scalar_text(&pair[1]).unwrap_or_default();
                    Ok((key, value))
                }
                other => Err(ApiError::InvalidRequest(format!(
                    "Query entries must be key/value pairs, got {}",
                    other
                ))),
            })
            .collect(),
        other => Err(ApiError::InvalidRequest(format!(
            "Query must be a map of parameters, got {}",
            other
        ))),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Filters {
        page: u32,
        per_page: u32,
        status: Option<String>,
        active: Option<bool>,
    }

    #[test]
    fn test_query_pairs_skip_unset_filters() {
        let pairs = query_pairs(&Filters {
            page: 2,
            per_page: 20,
            status: None,
            active: Some(true),
        })
        .expect("query should encode");

        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("per_page".to_string(), "20".to_string())));
        assert!(pairs.contains(&("active".to_string(), "true".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "status"));
    }

    #[test]
    fn test_query_pairs_accepts_unit_and_tuples() {
        assert!(query_pairs(&()).expect("unit encodes").is_empty());

        let pairs = query_pairs(&[("delete_user", "true")]).expect("tuples encode");
        assert_eq!(pairs, vec![("delete_user".to_string(), "true".to_string())]);

        assert!(query_pairs(&"plain").is_err());
    }

    #[test]
    fn test_multipart_drops_explicit_content_type() {
        let options = RequestOptions::new()
            .header("Content-Type", "application/json")
            .expect("valid header")
            .header("X-Trace", "abc")
            .expect("valid header");

        let request = RequestDescriptor::post("/admin/servers")
            .payload(Payload::Multipart(MultipartPayload::new().text("name", "edge-1")))
            .options(options.clone());
        let headers = request.effective_headers();
        assert!(headers.get(header::CONTENT_TYPE).is_none());
        assert_eq!(headers.get("x-trace").and_then(|v| v.to_str().ok()), Some("abc"));

        let request = RequestDescriptor::post("/admin/users").options(options);
        assert!(request.effective_headers().get(header::CONTENT_TYPE).is_some());
    }

    #[test]
    fn test_caller_cannot_override_authorization() {
        let options = RequestOptions::new()
            .header("Authorization", "Bearer forged")
            .expect("valid header");
        let request = RequestDescriptor::get("/admin/users").options(options);
        assert!(request.effective_headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_mime_type_is_rejected() {
        let payload = MultipartPayload::new().file("image", "a.png", Some("not a mime".into()), vec![1]);
        assert!(matches!(payload.to_form(), Err(ApiError::InvalidRequest(_))));
    }
}
