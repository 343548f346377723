//! Hume EVI configuration client.
//!
//! The API key stays server-side; the browser only ever talks to our proxy
//! endpoint.

use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod handlers;

#[derive(Debug, Error)]
pub enum HumeError {
    #[error("Hume API key is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// EVI resource collections exposed through the proxy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HumeResource {
    #[default]
    Configs,
    Tools,
    Prompts,
}

impl HumeResource {
    fn path(self) -> &'static str {
        match self {
            HumeResource::Configs => "/v0/evi/configs",
            HumeResource::Tools => "/v0/evi/tools",
            HumeResource::Prompts => "/v0/evi/prompts",
        }
    }
}

#[derive(Clone)]
pub struct HumeClient {
    client: Client,
    api_key: Option<String>,
    config_id: Option<String>,
    base_url: String,
}

impl HumeClient {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        config_id: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            config_id,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Lists a collection. For configs, fetches the configured EVI config
    /// directly when `HUME_CONFIG_ID` is set.
    pub async fn get(&self, resource: HumeResource) -> Result<Value, HumeError> {
        let path = match (resource, self.config_id.as_deref()) {
            (HumeResource::Configs, Some(id)) => format!("{}/{id}", resource.path()),
            _ => resource.path().to_string(),
        };
        self.send(Method::GET, &path, None).await
    }

    pub async fn create(&self, resource: HumeResource, body: &Value) -> Result<Value, HumeError> {
        self.send(Method::POST, resource.path(), Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HumeError> {
        let api_key = self.api_key.as_deref().ok_or(HumeError::NotConfigured)?;
        debug!("Hume {method} {path}");

        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Hume-Api-Key", api_key);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HumeError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, config_id: Option<&str>) -> HumeClient {
        HumeClient::new(
            Client::new(),
            Some("hume-key".into()),
            config_id.map(str::to_string),
            server.uri(),
        )
    }

    #[tokio::test]
    async fn test_get_config_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/evi/configs/cfg-1"))
            .and(header("X-Hume-Api-Key", "hume-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cfg-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let out = client(&server, Some("cfg-1"))
            .get(HumeResource::Configs)
            .await
            .unwrap();
        assert_eq!(out["id"], "cfg-1");
    }

    #[tokio::test]
    async fn test_lists_tools() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/evi/tools"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"tools_page": [{"id": "t1"}]})),
            )
            .mount(&server)
            .await;

        let out = client(&server, Some("cfg-1"))
            .get(HumeResource::Tools)
            .await
            .unwrap();
        assert_eq!(out["tools_page"][0]["id"], "t1");
    }

    #[tokio::test]
    async fn test_create_forwards_body() {
        let server = MockServer::start().await;
        let body = json!({"name": "Interview prompt", "text": "You are a recruiter."});
        Mock::given(method("POST"))
            .and(path("/v0/evi/prompts"))
            .and(body_json(body.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "p1"})))
            .expect(1)
            .mount(&server)
            .await;

        let out = client(&server, None)
            .create(HumeResource::Prompts, &body)
            .await
            .unwrap();
        assert_eq!(out["id"], "p1");
    }

    #[tokio::test]
    async fn test_api_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/evi/configs"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .get(HumeResource::Configs)
            .await
            .unwrap_err();
        assert!(matches!(err, HumeError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let hume = HumeClient::new(Client::new(), None, None, "http://127.0.0.1:1");
        let err = hume.get(HumeResource::Configs).await.unwrap_err();
        assert!(matches!(err, HumeError::NotConfigured));
    }
}
