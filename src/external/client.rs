use std::time::Duration;

use async_trait::async_trait;

use super::transport::{HttpTransport, OutboundRequest, TransportResponse};
use crate::config::settings::HttpSettings;

/// [`HttpTransport`] backed by a pooled `reqwest::Client`
///
/// Build one per process and share it (via `Arc`) between all adapters.
///
/// # Example
/// ```ignore
/// let transport = Arc::new(ReqwestTransport::new(&settings.http)?);
/// let dispatcher = Dispatcher::from_configs(&settings.services, transport);
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: &HttpSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            // Timeouts
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            // Connection pooling
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .gzip(true)
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn submit(&self, request: &OutboundRequest) -> anyhow::Result<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;

        Ok(TransportResponse {
            status: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_builds_from_default_settings() {
        let transport = ReqwestTransport::new(&HttpSettings::default());
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let settings = HttpSettings {
            timeout_seconds: 2,
            connect_timeout_seconds: 1,
            ..Default::default()
        };
        let transport = ReqwestTransport::new(&settings).unwrap();

        // Port 9 on localhost is the discard port and is expected to be closed.
        let result = transport
            .submit(&OutboundRequest::post("http://127.0.0.1:9/hook"))
            .await;
        assert!(result.is_err());
    }
}
