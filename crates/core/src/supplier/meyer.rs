//! Meyer sales-tracking client (JSON REST).
//!
//! Meyer is queried per Meyer order id, which is not the platform order
//! number: the ids live in `[SR-MID]` marker comments on the order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::MeyerConfig;
use crate::platform::Order;

use super::marker::{marker_ids, MEYER_ORDER_MARKER};
use super::{SupplierError, SupplierProfile, TrackingBatch, TrackingRecord, TrackingSource};

/// Records returned for one Meyer order id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesTracking {
    pub records: Vec<TrackingRecord>,
    pub body: String,
}

/// Meyer API client.
pub struct MeyerClient {
    client: Client,
    config: MeyerConfig,
    profile: SupplierProfile,
}

impl MeyerClient {
    /// Create a new Meyer client.
    pub fn new(config: MeyerConfig) -> Result<Self, SupplierError> {
        if config.auth.is_empty() {
            return Err(SupplierError::NotConfigured(
                "Meyer authorization is required".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SupplierError::NotConfigured(e.to_string()))?;

        let profile = SupplierProfile::meyer(config.carrier.clone());

        Ok(Self {
            client,
            config,
            profile,
        })
    }

    /// Ask Meyer for the shipments of one Meyer order.
    ///
    /// A JSON list is a batch of shipments; any other JSON value is Meyer's
    /// error payload and comes back as `SupplierError::VendorError`.
    pub async fn sales_tracking(&self, meyer_order_id: &str) -> Result<SalesTracking, SupplierError> {
        let url = format!("{}/SalesTracking", self.config.url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("OrderNumber", meyer_order_id)])
            .header(reqwest::header::AUTHORIZATION, &self.config.auth)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(meyer_order = meyer_order_id, status = %status, "Meyer response received");

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(SupplierError::Malformed {
                    message: format!("Meyer response is not JSON: {}", e),
                    body,
                })
            }
            Err(_) => {
                return Err(SupplierError::ApiError {
                    status: status.as_u16(),
                    body,
                })
            }
        };

        if !value.is_array() {
            let message = value
                .get("errorMessage")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {} without errorMessage", status.as_u16()));
            return Err(SupplierError::VendorError(message));
        }

        let shipments: Vec<MeyerShipment> =
            serde_json::from_value(value).map_err(|e| SupplierError::Malformed {
                message: format!("Unexpected Meyer shipment shape: {}", e),
                body: body.clone(),
            })?;

        let records = shipments
            .into_iter()
            .map(|s| {
                TrackingRecord::new(s.tracking_number.unwrap_or_default())
                    .with_reference(meyer_order_id)
            })
            .collect();

        Ok(SalesTracking { records, body })
    }
}

#[async_trait]
impl TrackingSource for MeyerClient {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn supplier_id(&self) -> u64 {
        self.config.supplier_id
    }

    fn profile(&self) -> &SupplierProfile {
        &self.profile
    }

    /// Query every marker id on the order, in comment order.
    ///
    /// A Meyer error payload only drops its own marker; transport and
    /// parse failures abandon the whole order.
    async fn fetch_tracking(&self, order: &Order) -> Result<TrackingBatch, SupplierError> {
        let mut batch = TrackingBatch::default();

        let ids = marker_ids(&order.comments, MEYER_ORDER_MARKER);
        if ids.is_empty() {
            info!(order = %order.order_number, "No Meyer order marker on order");
            return Ok(batch);
        }

        for meyer_order_id in ids {
            info!(meyer_order = %meyer_order_id, "Asking Meyer for tracking info");
            batch.requests += 1;

            match self.sales_tracking(&meyer_order_id).await {
                Ok(tracking) => {
                    info!(
                        meyer_order = %meyer_order_id,
                        records = tracking.records.len(),
                        "Tracking info retrieved"
                    );
                    batch.records.extend(tracking.records);
                    batch.last_body = Some(tracking.body);
                }
                Err(SupplierError::VendorError(message)) => {
                    info!(
                        meyer_order = %meyer_order_id,
                        "Could not retrieve tracking info: {}, skipping", message
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(batch)
    }
}

// Meyer API response types
#[derive(Debug, Deserialize)]
struct MeyerShipment {
    #[serde(rename = "TrackingNumber", default)]
    tracking_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OrderComment;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str) -> MeyerConfig {
        MeyerConfig {
            url: url.to_string(),
            auth: "Espresso token".to_string(),
            supplier_id: 11,
            carrier: "UPS".to_string(),
            timeout_secs: None,
        }
    }

    fn order_with(comments: &[&str]) -> Order {
        Order {
            order_number: "O-1".to_string(),
            order_placed_date: None,
            comments: comments
                .iter()
                .map(|t| OrderComment {
                    text: t.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_sales_tracking_returns_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/SalesTracking"))
            .and(query_param("OrderNumber", "M-42"))
            .and(header("Authorization", "Espresso token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"TrackingNumber": "1Z1", "Carrier": "UPS"},
                {"TrackingNumber": " 1Z2 "}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = MeyerClient::new(config(&server.uri())).unwrap();
        let tracking = client.sales_tracking("M-42").await.unwrap();

        assert_eq!(tracking.records.len(), 2);
        assert_eq!(tracking.records[0].tracking_number, "1Z1");
        assert_eq!(tracking.records[1].tracking_number, "1Z2");
        assert_eq!(tracking.records[1].reference.as_deref(), Some("M-42"));
    }

    #[tokio::test]
    async fn test_sales_tracking_error_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/SalesTracking"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"errorCode": 7, "errorMessage": "Order not found"})),
            )
            .mount(&server)
            .await;

        let client = MeyerClient::new(config(&server.uri())).unwrap();
        let err = client.sales_tracking("nope").await.unwrap_err();
        assert_eq!(err, SupplierError::VendorError("Order not found".to_string()));
    }

    #[tokio::test]
    async fn test_sales_tracking_non_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/SalesTracking"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = MeyerClient::new(config(&server.uri())).unwrap();
        let err = client.sales_tracking("M-1").await.unwrap_err();
        assert_eq!(err.raw_body(), Some("<html>oops</html>"));
        assert!(matches!(err, SupplierError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_tracking_without_markers_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = MeyerClient::new(config(&server.uri())).unwrap();
        let batch = client
            .fetch_tracking(&order_with(&["just a note"]))
            .await
            .unwrap();

        assert!(batch.is_empty());
        assert_eq!(batch.requests, 0);
    }

    #[tokio::test]
    async fn test_fetch_tracking_skips_failing_marker_only() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("OrderNumber", "BAD"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"errorMessage": "Invalid order"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("OrderNumber", "GOOD"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"TrackingNumber": "1Z9"}])),
            )
            .mount(&server)
            .await;

        let client = MeyerClient::new(config(&server.uri())).unwrap();
        let batch = client
            .fetch_tracking(&order_with(&["[SR-MID]: BAD", "[SR-MID]: GOOD"]))
            .await
            .unwrap();

        assert_eq!(batch.requests, 2);
        assert_eq!(batch.records, vec![TrackingRecord::new("1Z9").with_reference("GOOD")]);
    }

    #[tokio::test]
    async fn test_fetch_tracking_transport_failure_abandons_order() {
        let client = MeyerClient::new(config("http://127.0.0.1:1")).unwrap();
        let err = client
            .fetch_tracking(&order_with(&["[SR-MID]: A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, SupplierError::ConnectionFailed(_)));
    }

    #[test]
    fn test_new_requires_auth() {
        let mut cfg = config("http://localhost");
        cfg.auth = String::new();
        assert!(matches!(
            MeyerClient::new(cfg),
            Err(SupplierError::NotConfigured(_))
        ));
    }
}
