//! Decoded-frame translation and dispatch policy.
//!
//! [`RecordTranslator`] projects each decoded JSON value onto a
//! [`TelemetryRecord`] and issues the downstream requests in a fixed
//! order: detection (gated on the drone position being present), then
//! geoposition, then heartbeat (both unconditional). Delivery outcomes are
//! not inspected; the forwarder has already logged any failure.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::warn;

use crate::forward::{
    Detection, DetectionPosition, Forwarder, Geoposition, GeopositionPosition, Heartbeat,
    MetadataEntry,
};
use crate::models::DroneModelTable;
use crate::telemetry::TelemetryRecord;

/// Milliseconds since the Unix epoch, for outbound `time` fields.
#[must_use]
pub fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}

/// Translates decoded frames into downstream requests.
///
/// Cheap to clone; connections share the read-only model table and the
/// forwarder through `Arc`s.
#[derive(Clone)]
pub struct RecordTranslator {
    models: Arc<DroneModelTable>,
    forwarder: Arc<dyn Forwarder>,
}

impl RecordTranslator {
    #[must_use]
    pub fn new(models: Arc<DroneModelTable>, forwarder: Arc<dyn Forwarder>) -> Self {
        Self { models, forwarder }
    }

    /// Translate one decoded value and attempt its downstream calls.
    ///
    /// A value whose fields cannot be projected is logged and abandoned;
    /// the connection is unaffected. Returns once all applicable sends
    /// have been attempted, so frames from one connection dispatch
    /// strictly in arrival order.
    pub async fn dispatch(&self, value: Value) {
        let record = match TelemetryRecord::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "telemetry projection failed, abandoning frame");
                return;
            }
        };

        if let Some(detection) = self.detection_for(&record) {
            let _ = self.forwarder.send_detection(&detection).await;
        }
        let _ = self
            .forwarder
            .send_geoposition(&geoposition_for(&record))
            .await;
        let _ = self.forwarder.send_heartbeat(&heartbeat_for(&record)).await;
    }

    /// Detection payload, or `None` when the drone position is absent.
    fn detection_for(&self, record: &TelemetryRecord) -> Option<Detection> {
        let (Some(latitude), Some(longitude)) = (record.latitude, record.longitude) else {
            return None;
        };
        let model = record.model_code().map(|code| self.models.resolve(code));
        Some(Detection {
            sensor_id: record.aeroscope_serial_number.clone(),
            time: epoch_millis(),
            position: DetectionPosition {
                latitude,
                longitude,
                altitude: record.baro_height,
                accuracy: 1,
            },
            metadata: vec![
                MetadataEntry::primary("icao", record.serial.clone()),
                MetadataEntry::primary("registration", record.serial.clone()),
                MetadataEntry::plain("home_lat", Some(stringify(record.home_latitude))),
                MetadataEntry::plain("home_lng", Some(stringify(record.home_longitude))),
                MetadataEntry::plain("speed", Some(stringify(record.vx_north_speed))),
                MetadataEntry::plain("vspeed", Some(stringify(record.vz_rise_speed))),
                MetadataEntry::plain("uuid", record.uuid.clone()),
                MetadataEntry::plain("manufacturer", Some("DJI".to_owned())),
                MetadataEntry::plain("model", model),
            ],
        })
    }
}

/// Geoposition payload from the sensor's own coordinates.
fn geoposition_for(record: &TelemetryRecord) -> Geoposition {
    Geoposition {
        sensor_id: record.serial_number.clone(),
        time: epoch_millis(),
        position: GeopositionPosition {
            latitude: record.location_latitude,
            longitude: record.location_longitude,
            altitude: 0,
            accuracy: 0,
            speed_vertical: 0,
            speed_horizontal: 0,
            bearing: 0,
        },
    }
}

fn heartbeat_for(record: &TelemetryRecord) -> Heartbeat {
    Heartbeat {
        time: epoch_millis(),
        sensor_id: record.serial_number.clone(),
    }
}

/// Numeric metadata values travel as strings; an absent value travels as
/// the literal string "null", matching the established wire behaviour.
fn stringify(value: Option<f64>) -> String {
    value.map_or_else(|| "null".to_owned(), |v| v.to_string())
}
