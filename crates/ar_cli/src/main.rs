use std::sync::Arc;
use clap::Parser;
use tracing::{error, info, Level};
use ar_client::cli::{handle_command, QueryCommands};
use ar_client::logging::init_logging;
use ar_client::ArgsMeClient;
use ar_core::config::DEFAULT_BASE_URL;
use ar_core::{ArgumentApi, Config, Result};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search the args.me argument corpus", long_about = None)]
pub struct Cli {
    /// Base URL of the args.me v2 API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Log debug output, including every request URL
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: QueryCommands,
}

impl Cli {
    fn config(&self) -> Config {
        Config::default().with_base_url(self.base_url.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO });

    let config = cli.config();
    let api: Arc<dyn ArgumentApi> = Arc::new(ArgsMeClient::new(&config)?);
    info!("🌐 Using args.me API at {}", config.base_url);

    if let Err(e) = handle_command(cli.command, api, config).await {
        error!("❌ {}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "argscope", "search", "abortion", "--base-url", "http://localhost:8080/api/v2", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config().base_url, "http://localhost:8080/api/v2");
        assert!(matches!(cli.command, QueryCommands::Search(_)));
    }

    #[test]
    fn test_default_base_url() {
        let cli = Cli::try_parse_from(["argscope", "aspects", "gun", "control"]).unwrap();
        assert_eq!(cli.config().base_url, "https://www.args.me/api/v2");
        assert!(!cli.verbose);
    }
}
