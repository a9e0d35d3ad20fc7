use clap::Parser;
use infrastructure::config::Config;
use presentation::cli::{Cli, CliApp};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();
    shared::logging::init(&config.log_filter);
    tracing::debug!(
        "Using {} (embeddings) and {} (chat) at {}",
        config.embed_model,
        config.chat_model,
        config.ollama_base_url
    );

    let mut app = CliApp::new(&config)?;
    app.run(cli).await?;
    Ok(())
}
