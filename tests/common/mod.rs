//! Shared helpers for integration tests

#![allow(dead_code)]

use glip_export::config::{secret_string, GlipConfig};
use mockito::{Matcher, Mock, ServerGuard};
use std::path::Path;

pub const TOKEN: &str = "test-access-token";
pub const CREATED: &str = "2019-08-01T10:00:00.000Z";

/// Configuration pointing at a mock server and writing to `output_dir`
pub fn test_config(server_url: &str, output_dir: &Path) -> GlipConfig {
    let mut config = GlipConfig::default();
    config.platform.server_url = server_url.to_string();
    config.platform.client_id = "client".to_string();
    config.platform.client_secret = secret_string("secret".to_string());
    config.platform.username = "+16505550100".to_string();
    config.platform.password = secret_string("password".to_string());
    config.export.output_dir = output_dir.display().to_string();
    config
}

/// Token endpoint that always hands out [`TOKEN`]
pub async fn mock_token(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/restapi/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "access_token": TOKEN,
                "token_type": "bearer",
                "expires_in": 3600,
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Export task JSON body
pub fn task_body(id: &str, status: &str, dataset_uris: &[String]) -> String {
    let datasets: Vec<_> = dataset_uris
        .iter()
        .enumerate()
        .map(|(i, uri)| serde_json::json!({ "id": i.to_string(), "uri": uri }))
        .collect();
    serde_json::json!({
        "id": id,
        "uri": format!("https://platform.example.com/restapi/v1.0/glip/data-export/{id}"),
        "creationTime": CREATED,
        "lastModifiedTime": CREATED,
        "status": status,
        "datasets": datasets,
    })
    .to_string()
}

/// Content endpoint serving `body`, only when the token is in the query
pub async fn mock_content(server: &mut ServerGuard, path: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("access_token".into(), TOKEN.into()))
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

/// Expected archive file name for dataset `index`
pub fn archive_name(index: usize) -> String {
    format!("rc-export-reports_{CREATED}_{index}.zip")
}
