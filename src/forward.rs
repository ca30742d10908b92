//! Outbound wire payloads and the delivery boundary.
//!
//! The ingestion API accepts three POST endpoints, one JSON object per
//! call: `/detection`, `/geoposition`, and `/heartbeat`. Delivery is
//! fire-and-forget: failures are logged here and reported as
//! [`Delivery::Failed`], never retried and never surfaced to the
//! translator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Base URL of the AeroTracker ingestion API.
pub const DEFAULT_BASE_URL: &str = "http://52.56.37.226:3378";

/// Outcome of one delivery attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The API acknowledged the payload with a 2xx response.
    Delivered,
    /// Transport error or non-2xx response; already logged.
    Failed,
}

/// One `metadata` row in a detection payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub val: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl MetadataEntry {
    /// Row carrying the `"type": "primary"` marker.
    #[must_use]
    pub fn primary(key: &str, val: Option<String>) -> Self {
        Self {
            key: key.to_owned(),
            val,
            kind: Some("primary".to_owned()),
        }
    }

    /// Plain row without a type marker.
    #[must_use]
    pub fn plain(key: &str, val: Option<String>) -> Self {
        Self {
            key: key.to_owned(),
            val,
            kind: None,
        }
    }
}

/// Drone position block of a detection payload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectionPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub accuracy: u32,
}

/// Payload for `POST /detection`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    #[serde(rename = "sensor-id")]
    pub sensor_id: Option<String>,
    /// Wall-clock milliseconds since the epoch, synthesized at dispatch.
    pub time: i64,
    pub position: DetectionPosition,
    pub metadata: Vec<MetadataEntry>,
}

/// Sensor position block of a geoposition payload. The motion and accuracy
/// fields are wire-format defaults of the destination API, not telemetry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeopositionPosition {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: u32,
    pub accuracy: u32,
    #[serde(rename = "speed-vertical")]
    pub speed_vertical: u32,
    #[serde(rename = "speed-horizontal")]
    pub speed_horizontal: u32,
    pub bearing: u32,
}

/// Payload for `POST /geoposition`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Geoposition {
    #[serde(rename = "sensor-id")]
    pub sensor_id: Option<String>,
    pub time: i64,
    pub position: GeopositionPosition,
}

/// Payload for `POST /heartbeat`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heartbeat {
    pub time: i64,
    #[serde(rename = "sensor-id")]
    pub sensor_id: Option<String>,
}

/// Boundary between translation and the outbound transport.
///
/// Implementations own their error handling; the translator dispatches and
/// moves on regardless of the reported [`Delivery`].
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn send_detection(&self, detection: &Detection) -> Delivery;
    async fn send_geoposition(&self, geoposition: &Geoposition) -> Delivery;
    async fn send_heartbeat(&self, heartbeat: &Heartbeat) -> Delivery;
}

/// Forwarder that POSTs payloads to the ingestion API over HTTP.
#[derive(Clone, Debug)]
pub struct HttpForwarder {
    client: reqwest::Client,
    detection_url: String,
    geoposition_url: String,
    heartbeat_url: String,
}

impl HttpForwarder {
    /// Build a forwarder targeting `base_url`.
    ///
    /// # Errors
    /// Returns a [`reqwest::Error`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("aeroscope-relay/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            detection_url: format!("{base}/detection"),
            geoposition_url: format!("{base}/geoposition"),
            heartbeat_url: format!("{base}/heartbeat"),
        })
    }

    async fn post_json<T: Serialize + Sync>(&self, url: &str, payload: &T) -> Delivery {
        match self.client.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(url, status = %response.status(), "payload delivered");
                Delivery::Delivered
            }
            Ok(response) => {
                warn!(url, status = %response.status(), "ingestion API rejected payload");
                Delivery::Failed
            }
            Err(e) => {
                warn!(url, error = %e, "failed to reach ingestion API");
                Delivery::Failed
            }
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn send_detection(&self, detection: &Detection) -> Delivery {
        self.post_json(&self.detection_url, detection).await
    }

    async fn send_geoposition(&self, geoposition: &Geoposition) -> Delivery {
        self.post_json(&self.geoposition_url, geoposition).await
    }

    async fn send_heartbeat(&self, heartbeat: &Heartbeat) -> Delivery {
        self.post_json(&self.heartbeat_url, heartbeat).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        Detection, DetectionPosition, Geoposition, GeopositionPosition, Heartbeat, MetadataEntry,
    };

    #[test]
    fn detection_serializes_to_wire_schema() {
        let detection = Detection {
            sensor_id: Some("S1".into()),
            time: 1_700_000_000_000,
            position: DetectionPosition {
                latitude: 1.0,
                longitude: 2.0,
                altitude: Some(30.0),
                accuracy: 1,
            },
            metadata: vec![
                MetadataEntry::primary("icao", Some("X1".into())),
                MetadataEntry::plain("manufacturer", Some("DJI".into())),
            ],
        };

        assert_eq!(
            serde_json::to_value(&detection).expect("serialize detection"),
            json!({
                "sensor-id": "S1",
                "time": 1_700_000_000_000_i64,
                "position": {
                    "latitude": 1.0,
                    "longitude": 2.0,
                    "altitude": 30.0,
                    "accuracy": 1,
                },
                "metadata": [
                    {"key": "icao", "val": "X1", "type": "primary"},
                    {"key": "manufacturer", "val": "DJI"},
                ],
            })
        );
    }

    #[test]
    fn geoposition_serializes_with_zero_defaults() {
        let geoposition = Geoposition {
            sensor_id: None,
            time: 5,
            position: GeopositionPosition {
                latitude: Some(10.0),
                longitude: Some(20.0),
                altitude: 0,
                accuracy: 0,
                speed_vertical: 0,
                speed_horizontal: 0,
                bearing: 0,
            },
        };

        assert_eq!(
            serde_json::to_value(&geoposition).expect("serialize geoposition"),
            json!({
                "sensor-id": null,
                "time": 5,
                "position": {
                    "latitude": 10.0,
                    "longitude": 20.0,
                    "altitude": 0,
                    "accuracy": 0,
                    "speed-vertical": 0,
                    "speed-horizontal": 0,
                    "bearing": 0,
                },
            })
        );
    }

    #[test]
    fn heartbeat_serializes_sensor_id_and_time() {
        let heartbeat = Heartbeat {
            time: 7,
            sensor_id: Some("SN9".into()),
        };
        assert_eq!(
            serde_json::to_value(&heartbeat).expect("serialize heartbeat"),
            json!({"time": 7, "sensor-id": "SN9"})
        );
    }
}
