//! Cascade Router demo server.
//!
//! ```text
//!     Client Request
//!     ──────────▶ axum + tower-http (request id, trace, timeout, limit)
//!                     │
//!                     ▼
//!               Application ──▶ Router stack ──▶ middleware / routes / sub-routers
//!                     │                                   │
//!                     ▼                                   ▼
//!               final handler ◀──── Flow (Continue / Fail / Halt) ◀─┘
//! ```

use std::path::PathBuf;
use std::time::Instant;

use axum::http::StatusCode;
use clap::Parser;

use cascade_router::config::{load_config, ServerConfig};
use cascade_router::lifecycle::{wait_for_signal, Shutdown};
use cascade_router::observability::{logging, metrics};
use cascade_router::{Application, Error, Flow, HttpServer, Router};

#[derive(Parser, Debug)]
#[command(name = "cascade-router", version, about = "Middleware dispatch demo server")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

fn demo_app(config: &ServerConfig) -> Application {
    let mut app = Application::with_config(&config.app);

    app.use_(|ctx| {
        Box::pin(async move {
            let started = Instant::now();
            tracing::info!(
                method = %ctx.request.method(),
                url = %ctx.request.url(),
                "Incoming request"
            );
            tracing::debug!(elapsed = ?started.elapsed(), "Logger done");
            Flow::Continue
        })
    });

    app.get("/", |ctx| {
        ctx.send("home");
        Box::pin(async { Flow::Halt })
    });
    app.get("/books", |ctx| {
        ctx.send("books");
        Box::pin(async { Flow::Halt })
    });

    let mut users = Router::new();
    users.use_at("/1", |ctx| {
        ctx.send("first user");
        Box::pin(async { Flow::Halt })
    });
    users.use_at("/2", |ctx| {
        ctx.send("second user");
        Box::pin(async { Flow::Halt })
    });
    app.mount("/users", users);

    app.get("/boom", |_ctx| {
        Box::pin(async { Flow::fail(Error::with_status(StatusCode::IM_A_TEAPOT, "boom")) })
    });

    app.use_error(|err, ctx| {
        Box::pin(async move {
            tracing::warn!(error = %err, url = %ctx.request.original_url(), "Request failed");
            Flow::Fail(err)
        })
    });

    app
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!("cascade-router v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = demo_app(&config);
    let server = HttpServer::new(config, app);
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => tracing::info!(signal, "Signal received"),
            Err(err) => tracing::error!(error = %err, "Signal handler failed"),
        }
        trigger.trigger();
    });

    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
