//! Per-connection read loop.
//!
//! Each accepted connection runs one instance of [`run_connection`] on its
//! own task. State is entirely local: the residual buffer and the stream.
//! A slow downstream API therefore throttles only the connection that is
//! dispatching, never its neighbours.

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::buffer::ConnectionBuffer;
use crate::translate::RecordTranslator;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Drive one connection until the peer closes the stream or a read error
/// occurs.
///
/// Every chunk is appended to the connection's residual buffer; all frames
/// completed by the chunk are dispatched in arrival order before the next
/// read. Dispatch awaits the translator, so frame N+1 is not attempted
/// until frame N's downstream calls have completed or failed.
pub async fn run_connection<S>(mut stream: S, peer: SocketAddr, translator: &RecordTranslator)
where
    S: AsyncRead + Unpin,
{
    let mut buffer = ConnectionBuffer::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => {
                debug!(%peer, "peer closed stream");
                break;
            }
            Ok(n) => {
                buffer.append(&chunk[..n]);
                while let Some(value) = buffer.next_frame() {
                    translator.dispatch(value).await;
                }
            }
            Err(e) => {
                debug!(%peer, error = %e, "connection read error");
                break;
            }
        }
    }
}
