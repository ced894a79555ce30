//! `sommelier serve` — start the HTTP gateway.

use anyhow::Context;
use sommelier_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("Failed to load config")?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🍷 Sophia the Sommelier");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.model);

    sommelier_gateway::start(config)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(())
}
