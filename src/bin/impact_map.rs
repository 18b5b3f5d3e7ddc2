//! Produces an impact map for one email from the command line.
//!
//! Usage: `impact_map <email> [ageRange] [maritalStatus]`

use rust_impact_api::config::Config;
use rust_impact_api::enrichment::is_valid_email;
use rust_impact_api::impact::{Enricher, ImpactService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_impact_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let email = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: impact_map <email> [ageRange] [maritalStatus]"))?;
    if !is_valid_email(email.trim()) {
        anyhow::bail!("'{}' is not a valid email address", email);
    }
    let age_range = args.next();
    let marital_status = args.next();

    let config = Config::from_env()?;
    let service = ImpactService::new(Enricher::from_config(&config)?);

    let map = service
        .produce_impact_map(
            email.trim(),
            age_range.as_deref(),
            marital_status.as_deref(),
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}
