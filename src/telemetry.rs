//! Telemetry record projection.
//!
//! [`TelemetryRecord`] is the semantic view of one decoded frame: a fixed
//! set of optional drone- and sensor-position fields keyed by the upstream
//! engine's SCREAMING_SNAKE_CASE names. Absent fields stay `None`; nothing
//! is validated beyond presence. Records live only for the duration of one
//! dispatch and are never persisted.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Fields extracted from one decoded telemetry frame.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct TelemetryRecord {
    /// Drone serial used for the `icao`/`registration` metadata rows.
    #[serde(deserialize_with = "identifier")]
    pub serial: Option<String>,
    /// Drone latitude; gates detection emission together with longitude.
    pub latitude: Option<f64>,
    /// Drone longitude.
    pub longitude: Option<f64>,
    /// Barometric height, forwarded as detection altitude.
    pub baro_height: Option<f64>,
    pub app_gps_latitude: Option<f64>,
    pub app_gps_longitude: Option<f64>,
    pub home_latitude: Option<f64>,
    pub home_longitude: Option<f64>,
    pub vx_north_speed: Option<f64>,
    pub vy_east_speed: Option<f64>,
    pub vz_rise_speed: Option<f64>,
    pub yaw: Option<f64>,
    pub abs_gps_height: Option<f64>,
    pub sequence_number: Option<Value>,
    #[serde(deserialize_with = "identifier")]
    pub uuid: Option<String>,
    /// Model code; kept loosely typed, coerced via [`Self::model_code`].
    pub product_type: Option<Value>,
    pub status_info: Option<Value>,
    /// Device-reported timestamp. Never forwarded; outbound payloads carry
    /// wall-clock time instead.
    pub timestamp: Option<Value>,
    /// Sensor serial, the detection `sensor-id`.
    #[serde(deserialize_with = "identifier")]
    pub aeroscope_serial_number: Option<String>,
    /// Sensor latitude, forwarded in geoposition payloads.
    pub location_latitude: Option<f64>,
    /// Sensor longitude.
    pub location_longitude: Option<f64>,
    /// Sensor identifier used by geoposition and heartbeat payloads.
    #[serde(deserialize_with = "identifier")]
    pub serial_number: Option<String>,
}

impl TelemetryRecord {
    /// Project a decoded JSON value onto the telemetry field set.
    ///
    /// # Errors
    /// Returns a deserialisation error when the value is not a JSON object
    /// or a present field has an unexpected type; the caller logs it and
    /// abandons that value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("telemetry frame is not a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Coerce the product-type code to an integer, if one is present.
    ///
    /// Accepts integer, float, and numeric-string encodings since the
    /// upstream engine is not consistent about the wire type.
    #[must_use]
    pub fn model_code(&self) -> Option<i64> {
        match self.product_type.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Accept identifiers sent as strings or bare numbers.
fn identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }))
}
