use async_trait::async_trait;
use serde_json::json;
use shared::errors::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

pub type DynMessagingGateway = Arc<dyn MessagingGatewayTrait + Send + Sync>;

/// External messaging collaborator. Accepts a phone number and a message
/// body; delivery beyond this seam is the gateway operator's problem.
#[async_trait]
pub trait MessagingGatewayTrait {
    async fn send(&self, to: &str, body: &str) -> Result<(), ServiceError>;
}

/// HTTP gateway client. POSTs `{to, message}` as JSON with a bearer key.
#[derive(Clone)]
pub struct HttpMessagingGateway {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpMessagingGateway {
    pub fn new(url: &str, api_key: &str) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl MessagingGatewayTrait for HttpMessagingGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "to": to,
                "message": body,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("❌ Messaging gateway unreachable: {e}");
                ServiceError::NotificationDelivery(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!("❌ Messaging gateway rejected message: HTTP {status}");
            return Err(ServiceError::NotificationDelivery(format!(
                "gateway returned HTTP {status}"
            )));
        }

        info!("✅ Guest message submitted to gateway");
        Ok(())
    }
}
