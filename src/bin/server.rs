use anyhow::anyhow;
use email_summarizer::core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    email_summarizer::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Config error: {}", e);
        anyhow!(e)
    })?;

    email_summarizer::server::serve(config).await
}
