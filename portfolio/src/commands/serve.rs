use portfolio_config::Config;
use portfolio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{audit, email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Opening audit log directory");
    let audit = audit::open(&config.audit).await?;

    info!("Setting up smtp transport");
    let email = email::connect(&config.email)?;
    if let Err(err) = email.ping().await {
        // Contact form delivery will fail, but the catalog endpoints
        // should stay available.
        warn!("Failed to ping smtp server, starting anyway: {err:#}");
    }

    let server = environment::build_rest_server(&config, email, audit)?;

    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
