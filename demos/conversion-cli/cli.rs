use asset_conversion_engine::ConversionRequest;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Convert between assets against in-memory balances", long_about = None)]
pub struct Args {
    #[clap(long, env = "CONVERTER_DEMO_USER", default_value = "demo-user", help = "User whose balances are converted")]
    pub user: String,

    #[clap(long, help = "Symbol to convert from (e.g., USD)")]
    pub from: String,

    #[clap(long, help = "Symbol to convert to (e.g., XBT)")]
    pub to: String,

    #[clap(long, help = "Amount of the source symbol to debit, as a decimal string")]
    pub amount: String,

    #[clap(long, help = "Amount of the destination symbol to credit, as a decimal string")]
    pub to_amount: String,

    #[clap(long, env = "CONVERTER_DEMO_SEED", help = "JSON file with starting balances and prices; a built-in seed is used if omitted")]
    pub seed: Option<PathBuf>,

    #[clap(long, env = "CONVERTER_SYMBOLS", value_delimiter = ',', help = "Comma-separated list of known symbols")]
    pub symbols: Vec<String>,

    #[clap(long, env = "CONVERTER_TICKERS", value_delimiter = ',', help = "Comma-separated list of tradable tickers")]
    pub tickers: Vec<String>,

    #[clap(long, env = "CONVERTER_TICKER_POLICY", help = "Ticker resolution policy: substring, exact-split or strict")]
    pub ticker_policy: Option<String>,

    #[clap(long, env = "CONVERTER_GATEWAY_TIMEOUT_MS", help = "Execution gateway timeout in milliseconds")]
    pub gateway_timeout_ms: Option<u64>,

    #[clap(long, help = "Print the tradable and rejected tickers before converting")]
    pub show_graph: bool,

    #[clap(long, help = "Wait for the gateway to receive every hop before exiting")]
    pub wait_hops: bool,
}

impl Args {
    /// Set environment variables from parsed CLI arguments
    /// so that `ConversionConfig::from_env` sees flags and env alike
    pub fn set_environment_variables(&self) {
        use std::env;

        tracing::debug!("Setting environment variables from CLI arguments");

        if !self.symbols.is_empty() {
            env::set_var("CONVERTER_SYMBOLS", self.symbols.join(","));
        }
        if !self.tickers.is_empty() {
            env::set_var("CONVERTER_TICKERS", self.tickers.join(","));
        }
        if let Some(ref policy) = self.ticker_policy {
            env::set_var("CONVERTER_TICKER_POLICY", policy);
        }
        if let Some(timeout_ms) = self.gateway_timeout_ms {
            env::set_var("CONVERTER_GATEWAY_TIMEOUT_MS", timeout_ms.to_string());
        }

        tracing::info!(
            user = %self.user,
            from = %self.from,
            to = %self.to,
            amount = %self.amount,
            has_seed = self.seed.is_some(),
            "Environment variables set from CLI arguments"
        );
    }

    pub fn request(&self) -> ConversionRequest {
        ConversionRequest::new(
            self.user.clone(),
            self.from.trim().to_ascii_uppercase(),
            self.to.trim().to_ascii_uppercase(),
            self.amount.clone(),
            self.to_amount.clone(),
        )
    }
}

pub fn parse_cli_args() -> Args {
    let args = Args::parse();
    args.set_environment_variables();
    args
}
