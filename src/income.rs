use crate::classify::{self, RoleTier};
use crate::models::CompanySize;
use regex::Regex;
use std::sync::LazyLock;

/// Income bands, lowest first. Band shifts move along this list.
pub const INCOME_BANDS: [&str; 7] = [
    "$40K–$65K",
    "$65K–$100K",
    "$80K–$130K",
    "$100K–$150K",
    "$150K–$250K",
    "$250K–$400K",
    "$400K+",
];

/// Base band index by role tier (rows) and company size tier (columns:
/// enterprise/large, medium, small/startup).
const BASE_GRID: [[usize; 3]; 3] = [
    [5, 4, 3], // executive
    [4, 3, 2], // senior
    [2, 1, 0], // regular
];

static BAND_NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

fn size_column(size: CompanySize) -> usize {
    match size {
        CompanySize::Enterprise | CompanySize::Large => 0,
        CompanySize::Medium => 1,
        CompanySize::Small | CompanySize::Startup => 2,
    }
}

fn tier_row(tier: RoleTier) -> usize {
    match tier {
        RoleTier::Executive => 0,
        RoleTier::Senior => 1,
        RoleTier::Regular => 2,
    }
}

/// Index into [`INCOME_BANDS`] for the given signals.
pub fn income_band_index(
    role: &str,
    company_size: CompanySize,
    industry: Option<&str>,
    location: Option<&str>,
) -> usize {
    let base = BASE_GRID[tier_row(classify::role_tier(role))][size_column(company_size)] as i32;

    let mut shift = industry.map(classify::industry_pay_shift).unwrap_or(0);
    if location.is_some_and(classify::is_high_cost_location) {
        shift += 1;
    }

    (base + shift).clamp(0, INCOME_BANDS.len() as i32 - 1) as usize
}

/// Picks the income band label for a role at an employer.
pub fn estimate_income_band(
    role: &str,
    company_size: CompanySize,
    industry: Option<&str>,
    location: Option<&str>,
) -> &'static str {
    INCOME_BANDS[income_band_index(role, company_size, industry, location)]
}

/// Midpoint of a band label in dollars.
///
/// Reads the first one or two integers (thousands). A band with no upper bound
/// such as `"$400K+"` is treated as spanning up to double its lower bound.
pub fn income_band_to_number(band: &str) -> u64 {
    let mut numbers = BAND_NUMBERS
        .find_iter(band)
        .filter_map(|m| m.as_str().parse::<u64>().ok());

    let Some(low) = numbers.next() else {
        return 0;
    };
    let high = numbers.next().unwrap_or(low * 2);

    (low + high) * 1000 / 2
}
