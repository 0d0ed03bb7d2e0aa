use crate::app::App;
use crate::config::AppConfig;
use crate::responses::error_to_response;
use crate::router::handle;
use anyhow::{Context, Result};
use astra::Server;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod domain;
mod errors;
mod geocode;
mod predict;
mod responses;
mod router;
mod search;
mod session;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    // 1️⃣ Logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,property_compare=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2️⃣ Configuration + collaborators
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("BIND_ADDR is not a socket address: {}", config.bind_addr))?;
    let max_workers = config.max_workers;

    let app = App::from_config(config)?;

    // 3️⃣ Start the server
    tracing::info!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(max_workers);

    // 4️⃣ Serve requests, passing the app into the closure
    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => {
            tracing::debug!(error = %err, "request failed");
            error_to_response(err)
        }
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
        return Err(e.into());
    }

    tracing::info!("Server shut down cleanly.");
    Ok(())
}
