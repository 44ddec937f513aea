//! Common test utilities

use beacon::models::{GroupStyle, ProtocolKind, ServerGroup, ServerSpec};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Status API body for an online server
pub fn online_body(players: u64, max: u64, version: &str) -> String {
    format!(
        r#"{{"online":true,"ip":"127.0.0.1","port":25565,"players":{{"online":{players},"max":{max}}},"version":"{version}"}}"#
    )
}

/// Status API body for an offline server
#[allow(dead_code)]
pub fn offline_body() -> String {
    r#"{"online":false,"ip":"127.0.0.1","port":25565}"#.to_string()
}

/// Answer the status API path for `spec` with `body`
pub async fn mount_status(server: &MockServer, spec: &ServerSpec, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/2/{}", spec.endpoint())))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Java server descriptor on the default port
pub fn java_server(name: &str, address: &str) -> ServerSpec {
    ServerSpec::new(name, address, 25565, ProtocolKind::Java)
}

/// One detailed group with a hub and a survival server
#[allow(dead_code)]
pub fn main_group() -> ServerGroup {
    ServerGroup::new("Main Servers", GroupStyle::Detailed)
        .with_server(java_server("Hub", "hub.example.net"))
        .with_server(java_server("Survival", "survival.example.net"))
}
