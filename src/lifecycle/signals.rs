//! OS signal handling.
//!
//! Uses Tokio's async-safe signal streams. SIGINT and SIGTERM both mean
//! graceful shutdown.

use std::io;

/// Resolve on the first SIGINT (Ctrl+C) or SIGTERM.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

/// Resolve on Ctrl+C.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
}
