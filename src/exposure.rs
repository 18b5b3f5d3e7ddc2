use crate::models::{Dependent, RiskWeight};

/// Formats a dollar amount as `$XK` below one million and `$X.XM` above.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("${:.1}M", amount / 1_000_000.0)
    } else {
        format!("${}K", (amount / 1_000.0).round() as u64)
    }
}

/// Yearly income at risk: income times the summed dependent risk weights.
pub fn calculate_exposure(income: u64, dependents: &[Dependent]) -> String {
    let weight: f64 = dependents
        .iter()
        .map(|d| d.risk_weight.coefficient())
        .sum();
    let exposure = (income as f64 * weight).round();

    if exposure >= 1_000_000.0 {
        format!("${:.1}M+ annually", exposure / 1_000_000.0)
    } else {
        format!("${}K annually", (exposure / 1_000.0).round() as u64)
    }
}

/// Income multiple for the recommended range: 10x, plus 2 per critical and 1
/// per high-weight dependent.
pub fn coverage_multiplier(dependents: &[Dependent]) -> u64 {
    let critical = dependents
        .iter()
        .filter(|d| d.risk_weight == RiskWeight::Critical)
        .count() as u64;
    let high = dependents
        .iter()
        .filter(|d| d.risk_weight == RiskWeight::High)
        .count() as u64;

    10 + 2 * critical + high
}

/// Recommended life cover as `"$low – $high"`.
///
/// The low bound is capped at 12x income and the high bound at 15x.
pub fn calculate_recommended_coverage(income: u64, dependents: &[Dependent]) -> String {
    let multiplier = coverage_multiplier(dependents);
    let low = income * multiplier.min(12);
    let high = income * (multiplier + 3).min(15);

    format!(
        "{} – {}",
        format_amount(low as f64),
        format_amount(high as f64)
    )
}
