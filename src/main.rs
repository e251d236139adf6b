use clap::Parser;
use pickwise::cli::{self, Cli};
use pickwise::config::AppConfig;
use pickwise::logging;
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config)?;
    if cli.quiet {
        logging::init_simple();
    } else {
        logging::init(&config.logging);
    }

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!("Invalid configuration: {}", e);
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    cli::run(cli, config).await
}
