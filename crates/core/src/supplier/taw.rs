//! TAW tracking client (form-encoded POST, XML response).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::TawConfig;
use crate::platform::Order;

use super::taw_parser::parse_tracking_response;
use super::{SupplierError, SupplierProfile, TrackingBatch, TrackingRecord, TrackingSource};

/// TAW web service client.
pub struct TawClient {
    client: Client,
    config: TawConfig,
    profile: SupplierProfile,
}

impl TawClient {
    /// Create a new TAW client.
    pub fn new(config: TawConfig) -> Result<Self, SupplierError> {
        if config.username.is_empty() || config.password.is_empty() {
            return Err(SupplierError::NotConfigured(
                "TAW credentials are required".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SupplierError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            config,
            profile: SupplierProfile::taw(),
        })
    }

    /// Ask TAW for tracking on a purchase order.
    ///
    /// Returns the parsed records together with the raw body.
    pub async fn tracking_info(
        &self,
        po_number: &str,
    ) -> Result<(Vec<TrackingRecord>, String), SupplierError> {
        let url = format!("{}/GetTrackingInfo", self.config.url.trim_end_matches('/'));

        let params = [
            ("UserID", self.config.username.as_str()),
            ("Password", self.config.password.as_str()),
            ("PONumber", po_number),
            ("OrderNumber", ""),
        ];

        let response = self.client.post(&url).form(&params).send().await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(po = po_number, status = %status, "Response from TAW:\n{}", body);

        if !status.is_success() {
            return Err(SupplierError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        match parse_tracking_response(&body) {
            Ok(records) => Ok((records, body)),
            Err(e) => Err(SupplierError::Malformed {
                message: e.to_string(),
                body,
            }),
        }
    }
}

#[async_trait]
impl TrackingSource for TawClient {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn supplier_id(&self) -> u64 {
        self.config.supplier_id
    }

    fn profile(&self) -> &SupplierProfile {
        &self.profile
    }

    /// The platform order number doubles as the TAW purchase order number.
    async fn fetch_tracking(&self, order: &Order) -> Result<TrackingBatch, SupplierError> {
        let (records, body) = self.tracking_info(&order.order_number).await?;
        Ok(TrackingBatch {
            records,
            requests: 1,
            last_body: Some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str) -> TawConfig {
        TawConfig {
            url: url.to_string(),
            username: "taw user".to_string(),
            password: "p&ss".to_string(),
            supplier_id: 22,
            timeout_secs: None,
        }
    }

    fn order(number: &str) -> Order {
        Order {
            order_number: number.to_string(),
            order_placed_date: None,
            comments: vec![],
        }
    }

    #[tokio::test]
    async fn test_tracking_info_posts_form() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/GetTrackingInfo"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(
                "UserID=taw+user&Password=p%26ss&PONumber=PO-7&OrderNumber=",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<Info><Record><TrackNum>1Z1</TrackNum><OrderDate>03/05/2024</OrderDate>\
                 <Type>UPS</Type><InvoiceNumber>INV-1</InvoiceNumber></Record></Info>",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = TawClient::new(config(&server.uri())).unwrap();
        let batch = client.fetch_tracking(&order("PO-7")).await.unwrap();

        assert_eq!(batch.requests, 1);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].tracking_number, "1Z1");
        assert_eq!(batch.records[0].reference.as_deref(), Some("INV-1"));
        assert!(batch.last_body.unwrap().contains("<TrackNum>1Z1</TrackNum>"));
    }

    #[tokio::test]
    async fn test_tracking_info_malformed_keeps_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/GetTrackingInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Login failed"))
            .mount(&server)
            .await;

        let client = TawClient::new(config(&server.uri())).unwrap();
        let err = client.fetch_tracking(&order("PO-7")).await.unwrap_err();

        assert!(matches!(err, SupplierError::Malformed { .. }));
        assert_eq!(err.raw_body(), Some("Login failed"));
    }

    #[tokio::test]
    async fn test_tracking_info_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = TawClient::new(config(&server.uri())).unwrap();
        let err = client.tracking_info("PO-7").await.unwrap_err();
        assert_eq!(
            err,
            SupplierError::ApiError {
                status: 503,
                body: "down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_taw_is_connection_error() {
        let client = TawClient::new(config("http://127.0.0.1:1")).unwrap();
        let err = client.tracking_info("PO-7").await.unwrap_err();
        assert!(matches!(err, SupplierError::ConnectionFailed(_)));
    }
}
