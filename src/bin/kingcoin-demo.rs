#![forbid(unsafe_code)]

use clap::Parser;
use kingcoin::config::{self, Config};
use kingcoin::environment::Environment;

#[derive(Parser)]
#[command(
    name = "kingcoin-demo",
    about = "Runs the canonical KingCoin mint-and-transfer scenario"
)]
struct Args {
    /// Currency label for minted coins
    #[arg(long)]
    currency: Option<String>,

    /// Issuer name
    #[arg(long)]
    issuer: Option<String>,

    /// Holder names (repeat; at least two for the scenario)
    #[arg(long = "holder")]
    holders: Vec<String>,

    /// Print the full ledger as JSON after the run
    #[arg(long)]
    dump_ledger: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config: Config = config::load_config()?;
    if let Some(currency) = args.currency {
        config.currency = currency;
    }
    if let Some(issuer) = args.issuer {
        config.issuer_name = issuer;
    }
    if !args.holders.is_empty() {
        config.holder_names = args.holders;
    }

    let mut env = Environment::new(config)?;
    env.run_scenario()?;

    println!("Ledger entries: {}", env.ledger().len());
    for party in env.parties() {
        println!("  {}", party);
    }

    if args.dump_ledger {
        println!("{}", serde_json::to_string_pretty(env.ledger().transactions())?);
    }

    Ok(())
}
