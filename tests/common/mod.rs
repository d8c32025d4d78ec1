//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use cascade_router::{Application, Flow, HttpServer, Router, ServerConfig, Shutdown};
use tokio::net::TcpListener;

/// Shared record of what handlers observed.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Home, books and a `/users` sub-router answering `/1` and `/2`.
pub fn scenario_app() -> Application {
    let mut app = Application::new();
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
    app
}

/// Serve `app` on an ephemeral port until the returned `Shutdown` fires.
pub async fn start_server(app: Application) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(ServerConfig::default(), app);
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    (addr, shutdown)
}
