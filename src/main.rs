use anyhow::Result;
use clap::Parser;
use ratechat::core::config::AppConfig;
use ratechat::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Currencies reported when an exchange command names none (default: USD EUR)
    #[arg(long, num_args = 1..)]
    currencies: Option<Vec<String>>,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(currencies) = self.currencies {
            config.currencies = currencies;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    };
    let result = match result {
        Ok(config) => ratechat::run(cli.apply(config)).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Server failed");
    }
    result
}
