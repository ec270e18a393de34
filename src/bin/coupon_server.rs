//! Coupon API server.
//!
//! Usage: `coupon-server [CONFIG_PATH]`. Without an argument the config is
//! read from `~/.config/coupon-scout/config.toml` if it exists. `PORT`
//! overrides the configured listen port.

use std::path::PathBuf;

use coupon_scout::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ServiceConfig::default_config_path);

    let port = std::env::var("PORT").ok();
    let config = ServiceConfig::load(&path)
        .and_then(|c| c.with_port_override(port.as_deref()))
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?;

    tracing::info!(config = %path.display(), "coupon-server starting");

    coupon_scout::run_server(config).await.map_err(|e| {
        tracing::error!(error = %e, "coupon-server exited with error");
        anyhow::anyhow!("coupon-server failed: {e}")
    })?;

    tracing::info!("coupon-server shut down cleanly");
    Ok(())
}
