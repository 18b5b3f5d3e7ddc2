//! Runs a handful of addresses through the mock enricher and prints a
//! one-line summary per impact map.
//!
//! Run with: `cargo run --example batch_impact`

use anyhow::Result;
use rust_impact_api::impact::{Enricher, ImpactService};
use rust_impact_api::mock_enricher::MockEnricher;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Batch Impact Maps (mock enrichment) ===\n");

    let service = ImpactService::new(Enricher::Mock(MockEnricher));

    let subjects = [
        ("john.doe@acme.com", Some("35-44"), Some("married")),
        ("maria.silva@globex.io", Some("25-34"), Some("single")),
        ("ops@initech.com", None, None),
        ("sam.lee@gmail.com", Some("55-64"), Some("married")),
    ];

    let total = subjects.len();
    let mut success_count = 0;
    let mut fail_count = 0;

    for (i, (email, age_range, marital_status)) in subjects.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, total, email);

        match service
            .produce_impact_map(email, *age_range, *marital_status)
            .await
        {
            Ok(map) => {
                success_count += 1;
                println!(
                    "  ✓ {} | {} | exposure {} | coverage {} | score {}",
                    map.person.name,
                    map.income_band,
                    map.estimated_annual_exposure,
                    map.recommended_coverage_range,
                    map.decisioning.coverage_confidence_score
                );
            }
            Err(e) => {
                fail_count += 1;
                println!("  ✗ {}", e);
            }
        }
    }

    println!("\n=== Summary ===");
    println!("Total: {}", total);
    println!("Success: {}", success_count);
    println!("Failed: {}", fail_count);

    Ok(())
}
