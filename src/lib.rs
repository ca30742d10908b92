//! Aeroscope-to-AeroTracker telemetry relay.
//!
//! Ingests concatenated JSON telemetry frames from a DJI Aeroscope
//! integration engine over persistent TCP connections and relays the
//! drone- and sensor-position fields to a remote ingestion API as
//! detection, geoposition, and heartbeat requests.
//!
//! The core is the streaming pipeline: bytes accumulate in a
//! per-connection [`buffer::ConnectionBuffer`], [`frame::decode_frame`]
//! extracts complete JSON values regardless of how the transport split
//! them, and [`translate::RecordTranslator`] routes each value to its
//! downstream requests in arrival order.

pub mod buffer;
pub mod connection;
pub mod error;
pub mod forward;
pub mod frame;
pub mod models;
pub mod server;
pub mod status;
pub mod telemetry;
pub mod translate;

pub use buffer::ConnectionBuffer;
pub use error::RelayError;
pub use forward::{DEFAULT_BASE_URL, Delivery, Forwarder, HttpForwarder};
pub use frame::{DecodeOutcome, decode_frame};
pub use models::DroneModelTable;
pub use server::{BackoffConfig, RelayServer};
pub use telemetry::TelemetryRecord;
pub use translate::RecordTranslator;
