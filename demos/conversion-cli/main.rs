pub mod cli;
pub mod seed;

use asset_conversion_engine::adapters::{BalanceStore, InMemoryBalanceStore, InMemoryPriceOracle, RecordingGateway};
use asset_conversion_engine::errors::Result;
use asset_conversion_engine::{BalancePool, ConversionConfig, ConversionEnvelope, ConversionOrchestratorBuilder};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("conversion_cli=info".parse().map_err(anyhow::Error::from)?),
        )
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();

    let args = cli::parse_cli_args();
    let config = ConversionConfig::from_env()?;

    let seed = match &args.seed {
        Some(path) => seed::Seed::load(path)?,
        None => seed::Seed::builtin()?,
    };

    let store = Arc::new(InMemoryBalanceStore::new());
    let oracle = Arc::new(InMemoryPriceOracle::new());
    let gateway = Arc::new(RecordingGateway::new());
    seed.apply(&args.user, &store, &oracle).await;

    let orchestrator = ConversionOrchestratorBuilder::new()
        .with_config(config.clone())
        .with_balance_store(store.clone())
        .with_price_oracle(oracle)
        .with_gateway(gateway.clone())
        .build()?;

    if args.show_graph {
        let graph = orchestrator.graph().await;
        println!("Tradable tickers: {}", graph.tradable_tickers().join(", "));
        for rejected in graph.rejected_tickers() {
            println!("Rejected ticker {} (matched {:?})", rejected.ticker, rejected.matched);
        }
    }

    tracing::info!("Starting conversion");

    let result = orchestrator.convert(&args.request()).await;
    let hop_count = result.as_ref().map_or(0, |receipt| receipt.hops.len());
    let envelope = ConversionEnvelope::from(result);

    if args.wait_hops && hop_count > 0 {
        let received = gateway.wait_for(hop_count, config.gateway_timeout()).await;
        tracing::info!(
            expected = hop_count,
            received = received.len(),
            "Gateway hop delivery"
        );
    }

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    let balances = store.get_balances(&args.user).await?;
    for pool in BalancePool::DRAIN_ORDER {
        if let Some(entries) = balances.pool(pool) {
            for (symbol, amount) in entries {
                println!("{:<16} {:<6} {}", pool, symbol, amount);
            }
        }
    }

    if !envelope.success {
        std::process::exit(1);
    }

    Ok(())
}
