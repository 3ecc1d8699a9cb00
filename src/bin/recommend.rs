//! One-shot crop analysis from the command line, printing the result as JSON.
//!
//! Usage: cargo run --features cli --bin recommend -- Patna Bihar 5

use clap::Parser;
use crop_advisor_rust::{AdvisorConfig, AnalysisRequest, CropAdvisor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "recommend", version, about = "Most profitable crops for a district")]
struct Cli {
    /// District name, e.g. Patna
    district: String,

    /// State the district belongs to, e.g. Bihar
    state: String,

    /// Land size in acres (0 < acres <= 1000)
    acres: f64,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AdvisorConfig::from_env();
    config.log_summary();

    let advisor = CropAdvisor::from_config(&config);
    let request = AnalysisRequest::new(cli.district, cli.state, cli.acres);
    let result = advisor.analyze(&request).await?;

    let output = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);

    Ok(())
}
