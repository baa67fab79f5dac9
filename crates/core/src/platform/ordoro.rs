//! Ordoro REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

use crate::config::PlatformConfig;

use super::{AwaitingOrders, PlatformError, PlatformGateway, ShippingMetadata};

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    comment: &'a str,
}

/// Ordoro client implementation.
pub struct OrdoroClient {
    client: Client,
    config: PlatformConfig,
}

impl OrdoroClient {
    /// Create a new Ordoro client.
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        if config.username.is_empty() || config.password.is_empty() {
            return Err(PlatformError::NotConfigured(
                "Ordoro credentials are required".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PlatformError::NotConfigured(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn order_url(&self, order_number: &str, suffix: &str) -> String {
        format!(
            "{}/order/{}/{}",
            self.base_url(),
            urlencoding::encode(order_number),
            suffix
        )
    }

    /// Turn a non-2xx response into an error, keeping the body for the log.
    async fn check_status(response: Response) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PlatformError::ApiError {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        })
    }
}

#[async_trait]
impl PlatformGateway for OrdoroClient {
    async fn awaiting_tracking(&self, supplier_id: u64) -> Result<AwaitingOrders, PlatformError> {
        let url = format!("{}/order/", self.base_url());

        debug!(
            supplier_id = supplier_id,
            tag = %self.config.awaiting_tracking_tag,
            "Listing orders awaiting tracking"
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .query(&[
                ("supplier", supplier_id.to_string()),
                ("tag", self.config.awaiting_tracking_tag.clone()),
                ("limit", self.config.page_limit.to_string()),
            ])
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        response
            .json::<AwaitingOrders>()
            .await
            .map_err(|e| PlatformError::ParseError(format!("Failed to parse order listing: {}", e)))
    }

    async fn post_shipping_metadata(
        &self,
        order_number: &str,
        metadata: &ShippingMetadata,
    ) -> Result<(), PlatformError> {
        let url = self.order_url(order_number, "shipping_info/");

        debug!(order = order_number, tracking = %metadata.tracking_number, "Posting shipping info");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(metadata)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn clear_awaiting_tracking(&self, order_number: &str) -> Result<(), PlatformError> {
        let url = self.order_url(
            order_number,
            &format!("tag/{}/", self.config.awaiting_tracking_tag_id),
        );

        debug!(order = order_number, "Removing awaiting tracking tag");

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn post_comment(&self, order_number: &str, text: &str) -> Result<(), PlatformError> {
        let url = self.order_url(order_number, "comment/");

        debug!(order = order_number, "Posting comment");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&CommentBody { comment: text })
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
