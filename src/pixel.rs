//! Pixel event emitter.
//!
//! Best-effort, at-most-once forwarding of commerce events to the configured
//! pixel collection endpoint. An unconfigured or unreachable endpoint is a
//! normal condition, not an error: `track` reports availability through its
//! return value and never fails the caller.

use serde_json::{json, Value};

pub struct PixelClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    pixel_id: Option<String>,
    currency: String,
}

impl PixelClient {
    pub fn new(endpoint: Option<String>, pixel_id: Option<String>, currency: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint,
            pixel_id,
            currency,
        }
    }

    pub fn pixel_id(&self) -> Option<&str> {
        self.pixel_id.as_deref()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Send one event to the pixel endpoint. Returns whether the endpoint was
    /// configured and accepted the call. No retry, no queue.
    pub async fn track(&self, event_name: &str, parameters: Value) -> bool {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!("pixel endpoint not configured, skipping event: {}", event_name);
            return false;
        };

        let payload = json!({
            "pixel_id": self.pixel_id,
            "event_name": event_name,
            "parameters": parameters,
        });

        match self.http.post(endpoint).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!("pixel event sent: {}", event_name);
                true
            }
            Ok(resp) => {
                tracing::warn!("pixel endpoint rejected event {}: {}", event_name, resp.status());
                false
            }
            Err(e) => {
                tracing::warn!("failed to send pixel event {}: {}", event_name, e);
                false
            }
        }
    }

    /// Purchase event for a converted client.
    pub async fn track_purchase(&self, value: f64, content_ids: &[String]) -> bool {
        self.track(
            "Purchase",
            json!({
                "value": value,
                "currency": self.currency,
                "content_type": "product",
                "content_ids": content_ids,
            }),
        )
        .await
    }

    /// Lead event for a new registration.
    pub async fn track_lead(&self, value: f64) -> bool {
        self.track(
            "Lead",
            json!({
                "content_name": "Lead Generation",
                "content_category": "Sales",
                "value": value,
                "currency": self.currency,
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_endpoint_is_not_an_error() {
        let pixel = PixelClient::new(None, Some("12345".to_string()), "BRL".to_string());
        assert!(!pixel.track_lead(0.0).await);
        assert!(!pixel.track_purchase(500.0, &["client_abc".to_string()]).await);
    }
}
