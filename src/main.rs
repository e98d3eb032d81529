//! # Raw HTTP Server - Entry Point
//! src/main.rs
//!
//! Arranca el servidor, espera la orden del operador (consola o Ctrl-C) y
//! no termina hasta que todas las conexiones en curso hayan cerrado.

use raw_http_server::config::Config;
use raw_http_server::error::Result;
use raw_http_server::lifecycle::{self, Shutdown};
use raw_http_server::server::Server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raw_http_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();

    if let Err(e) = run(config).await {
        error!(error = %e, "error fatal");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let server = Server::new(&config)?;
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    let serving = tokio::spawn(server.serve(listener, shutdown.signal()));

    info!("presiona Enter o Ctrl-C para detener el servidor");
    lifecycle::wait_for_operator().await;

    shutdown.trigger();
    serving.await??;

    info!("Good bye!");
    Ok(())
}
