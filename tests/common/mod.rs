//! Shared fixtures for integration tests.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aeroscope_relay::forward::{Delivery, Detection, Forwarder, Geoposition, Heartbeat};
use aeroscope_relay::{DroneModelTable, RecordTranslator};

/// A downstream call captured by [`RecordingForwarder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Detection(Detection),
    Geoposition(Geoposition),
    Heartbeat(Heartbeat),
}

/// Forwarder that records every call instead of reaching a network.
#[derive(Default)]
pub struct RecordingForwarder {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingForwarder {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().expect("forwarder lock").clone()
    }
}

#[async_trait]
impl Forwarder for RecordingForwarder {
    async fn send_detection(&self, detection: &Detection) -> Delivery {
        self.sent
            .lock()
            .expect("forwarder lock")
            .push(Sent::Detection(detection.clone()));
        Delivery::Delivered
    }

    async fn send_geoposition(&self, geoposition: &Geoposition) -> Delivery {
        self.sent
            .lock()
            .expect("forwarder lock")
            .push(Sent::Geoposition(geoposition.clone()));
        Delivery::Delivered
    }

    async fn send_heartbeat(&self, heartbeat: &Heartbeat) -> Delivery {
        self.sent
            .lock()
            .expect("forwarder lock")
            .push(Sent::Heartbeat(heartbeat.clone()));
        Delivery::Delivered
    }
}

/// Translator wired to a recording forwarder.
pub fn recording_translator() -> (RecordTranslator, Arc<RecordingForwarder>) {
    let forwarder = Arc::new(RecordingForwarder::default());
    let translator = RecordTranslator::new(Arc::new(DroneModelTable::new()), forwarder.clone());
    (translator, forwarder)
}
