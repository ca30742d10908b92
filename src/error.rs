//! Startup error taxonomy.
//!
//! Only startup failures are fatal to the process. Everything after the
//! listeners are bound is handled in place: malformed frames reset the
//! buffer, delivery failures are logged by the forwarder, and connection
//! I/O errors end that connection's read loop alone.

use std::net::SocketAddr;

use thiserror::Error;

/// Fatal errors raised while bringing the relay up.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A listening socket could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that could not be bound.
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The port leaves no room for the status listener on the next port.
    #[error("port {0} leaves no room for the status listener")]
    PortExhausted(u16),

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
