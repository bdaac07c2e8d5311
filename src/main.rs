use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lead_intake::adapters::http::router;
use lead_intake::domain::ports::ConfigProvider;
use lead_intake::utils::logger;
use lead_intake::{CliConfig, LeadIntake, ResendClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting lead-intake server");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let (server, config) = match cli.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if config.api_key().is_none() {
        // 不擋啟動，每個請求會回 500
        tracing::warn!("RESEND_API_KEY is not set; submissions will be rejected with 500");
    }
    tracing::info!(to = %config.recipient, from = %config.sender, "Lead notifications configured");

    let sender = ResendClient::from_config(&config).context("failed to build Resend client")?;
    let intake = Arc::new(LeadIntake::new(sender, config));
    let app = router(intake, &server.path);

    let listener = tokio::net::TcpListener::bind(server.listen.as_str())
        .await
        .with_context(|| format!("failed to bind {}", server.listen))?;
    tracing::info!("✅ Listening on http://{}{}", server.listen, server.path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
