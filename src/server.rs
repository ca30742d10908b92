//! Tokio-based relay server.
//!
//! [`RelayServer`] owns two listeners: the telemetry stream listener and
//! the liveness endpoint on the next port up. Each accepted telemetry
//! connection runs on its own tracked task, so accepting and reading never
//! block across connections. A [`CancellationToken`] propagates shutdown;
//! in-flight reads and outbound requests are abandoned rather than
//! drained.

use std::net::{IpAddr, SocketAddr};
use std::{future::Future, io};

use tokio::net::TcpListener;
use tokio::time::{Duration, sleep};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, warn};

use crate::connection::run_connection;
use crate::error::RelayError;
use crate::status;
use crate::translate::RecordTranslator;

/// Exponential back-off timing for `accept()` failures.
///
/// The delay starts at `initial_delay`, doubles on each consecutive
/// failure, and is capped at `max_delay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Delay after the first failed accept.
    pub initial_delay: Duration,
    /// Ceiling for the doubled delays.
    pub max_delay: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl BackoffConfig {
    /// Clamp delays to sane bounds and ensure `initial_delay <= max_delay`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.initial_delay = self.initial_delay.max(Duration::from_millis(1));
        self.max_delay = self.max_delay.max(Duration::from_millis(1));
        if self.initial_delay > self.max_delay {
            std::mem::swap(&mut self.initial_delay, &mut self.max_delay);
        }
        self
    }
}

/// Accepts telemetry connections and supervises their read loops.
pub struct RelayServer {
    translator: RecordTranslator,
    telemetry: TcpListener,
    status: TcpListener,
    backoff: BackoffConfig,
}

impl RelayServer {
    /// Bind the telemetry listener on `(bind, port)` and the status
    /// listener on `(bind, port + 1)`.
    ///
    /// Port 0 asks the OS for an ephemeral port on both listeners; the
    /// next-port-up convention only applies to concrete ports.
    ///
    /// # Errors
    /// Returns [`RelayError::Bind`] if either socket cannot be bound, or
    /// [`RelayError::PortExhausted`] when `port` is the last port number.
    pub async fn bind(
        bind: IpAddr,
        port: u16,
        translator: RecordTranslator,
    ) -> Result<Self, RelayError> {
        let status_port = if port == 0 {
            0
        } else {
            port.checked_add(1).ok_or(RelayError::PortExhausted(port))?
        };
        let telemetry = bind_listener(SocketAddr::new(bind, port)).await?;
        let status = bind_listener(SocketAddr::new(bind, status_port)).await?;
        Ok(Self {
            translator,
            telemetry,
            status,
            backoff: BackoffConfig::default(),
        })
    }

    /// Override the accept back-off timing.
    #[must_use]
    pub fn backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = config.normalized();
        self
    }

    /// Address of the telemetry listener (useful after binding port 0).
    ///
    /// # Errors
    /// Returns an [`io::Error`] if the local address cannot be queried.
    pub fn telemetry_addr(&self) -> io::Result<SocketAddr> {
        self.telemetry.local_addr()
    }

    /// Address of the status listener.
    ///
    /// # Errors
    /// Returns an [`io::Error`] if the local address cannot be queried.
    pub fn status_addr(&self) -> io::Result<SocketAddr> {
        self.status.local_addr()
    }

    /// Run until Ctrl+C.
    pub async fn run(self) {
        self.run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    }

    /// Run until the `shutdown` future resolves.
    ///
    /// Shutdown cancels all connection tasks and the status server without
    /// draining in-flight work.
    pub async fn run_until<S>(self, shutdown: S)
    where
        S: Future<Output = ()> + Send,
    {
        let Self {
            translator,
            telemetry,
            status,
            backoff,
        } = self;
        let token = CancellationToken::new();
        let tracker = TaskTracker::new();

        if let Ok(addr) = telemetry.local_addr() {
            info!(%addr, "telemetry listener ready");
        }
        if let Ok(addr) = status.local_addr() {
            info!(%addr, "status endpoint ready");
        }

        tracker.spawn(serve_status(status, token.clone()));
        tracker.spawn(accept_loop(
            telemetry,
            translator,
            token.clone(),
            tracker.clone(),
            backoff,
        ));

        tokio::select! {
            () = shutdown => {
                info!("shutdown requested");
                token.cancel();
            }
            () = tracker.wait() => {}
        }

        token.cancel();
        tracker.close();
        tracker.wait().await;
    }
}

async fn bind_listener(address: SocketAddr) -> Result<TcpListener, RelayError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| RelayError::Bind { address, source })
}

async fn serve_status(listener: TcpListener, token: CancellationToken) {
    let service = status::router();
    if let Err(e) = axum::serve(listener, service)
        .with_graceful_shutdown(token.cancelled_owned())
        .await
    {
        error!(error = %e, "status server failed");
    }
}

/// Accept connections until cancelled, backing off on accept failures.
async fn accept_loop(
    listener: TcpListener,
    translator: RecordTranslator,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    backoff: BackoffConfig,
) {
    let backoff = backoff.normalized();
    let mut delay = backoff.initial_delay;
    loop {
        tokio::select! {
            biased;

            () = shutdown.cancelled() => break,

            res = listener.accept() => match res {
                Ok((stream, peer)) => {
                    debug!(%peer, "accepted telemetry connection");
                    let translator = translator.clone();
                    let token = shutdown.clone();
                    tracker.spawn(async move {
                        tokio::select! {
                            () = token.cancelled() => {}
                            () = run_connection(stream, peer, &translator) => {}
                        }
                    });
                    delay = backoff.initial_delay;
                }
                Err(e) => {
                    warn!(error = %e, "accept error");
                    sleep(delay).await;
                    delay = (delay * 2).min(backoff.max_delay);
                }
            },
        }
    }
}
