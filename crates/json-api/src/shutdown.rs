//! Graceful shutdown on SIGINT / SIGTERM.

use std::{fmt, io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
#[error("failed to install {signal} handler: {source}")]
pub(crate) struct ShutdownSignalError {
    signal: StopSignal,
    #[source]
    source: io::Error,
}

/// The signal that asked the server to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Wait for a stop signal, then let in-flight requests (checkouts included) finish within `grace`.
pub(crate) async fn listen(handle: ServerHandle, grace: Duration) -> Result<(), ShutdownSignalError> {
    let signal = wait_for_signal().await?;

    info!(%signal, grace_seconds = grace.as_secs(), "stopping server");

    handle.stop_graceful(Some(grace));

    Ok(())
}

async fn wait_for_signal() -> Result<StopSignal, ShutdownSignalError> {
    let interrupt = async {
        signal::ctrl_c()
            .await
            .map(|()| StopSignal::Interrupt)
            .map_err(|source| ShutdownSignalError {
                signal: StopSignal::Interrupt,
                source,
            })
    };

    tokio::select! {
        result = interrupt => result,
        result = terminate() => result,
    }
}

#[cfg(unix)]
async fn terminate() -> Result<StopSignal, ShutdownSignalError> {
    let mut stream = signal::unix::signal(signal::unix::SignalKind::terminate()).map_err(
        |source| ShutdownSignalError {
            signal: StopSignal::Terminate,
            source,
        },
    )?;

    stream.recv().await;

    Ok(StopSignal::Terminate)
}

#[cfg(not(unix))]
async fn terminate() -> Result<StopSignal, ShutdownSignalError> {
    std::future::pending().await
}
