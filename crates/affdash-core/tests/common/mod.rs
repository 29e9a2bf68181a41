#![allow(dead_code)]

use std::sync::Arc;

use affdash_core::{ApiClient, Config, MemorySessionStore, SessionData, SessionStore};
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn config_for(server: &MockServer) -> Config {
    Config {
        api_url: server.uri(),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

pub fn client_with(server: &MockServer, store: Arc<dyn SessionStore>) -> ApiClient {
    ApiClient::new(&config_for(server), store).expect("client should build")
}

pub fn signed_in(token: &str, refresh_token: &str) -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(SessionData::new(
        token,
        refresh_token,
    )))
}

pub fn users_body() -> Value {
    json!({
        "users": [
            {"id": 1, "email": "ada@example.com", "first_name": "Ada", "last_name": "Lovelace"},
            {"id": 2, "email": "alan@example.com"}
        ],
        "meta": {"current_page": 1, "total_pages": 1, "total_count": 2}
    })
}

pub fn auth_body(token: &str, refresh_token: &str) -> Value {
    json!({
        "token": token,
        "refresh_token": refresh_token,
        "user": {"id": 1, "email": "root@example.com", "role_type": "super_admin"}
    })
}
