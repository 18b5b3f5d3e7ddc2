use chrono::{DateTime, Datelike, Utc};
use std::collections::HashSet;

use crate::classify::{self, RoleSignal};
use crate::models::{
    CompanySize, Confidence, Dependent, DependentType, EnrichedProfile, LifeEvent, LifeEventType,
    PositionStart,
};

pub const MAX_LIFE_EVENTS: usize = 5;

const FAMILY_FORMATION_YEARS: &[&str] = &["30-39", "40-49"];

/// Whole months between a position start and `now`, never negative.
pub fn tenure_months(start: &PositionStart, now: DateTime<Utc>) -> i64 {
    let start_month = start.month.unwrap_or(1).clamp(1, 12) as i64;
    let months =
        (now.year() as i64 - start.year as i64) * 12 + (now.month() as i64 - start_month);
    months.max(0)
}

/// Detects life events as of now.
pub fn detect_life_events(
    profile: &EnrichedProfile,
    age_range: Option<&str>,
    marital_status: Option<&str>,
    dependents: &[Dependent],
    annual_income_estimate: u64,
) -> Vec<LifeEvent> {
    detect_life_events_at(
        profile,
        age_range,
        marital_status,
        dependents,
        annual_income_estimate,
        Utc::now(),
    )
}

/// Detects life events relative to `now`; ranked, deduplicated, at most five.
pub fn detect_life_events_at(
    profile: &EnrichedProfile,
    age_range: Option<&str>,
    marital_status: Option<&str>,
    dependents: &[Dependent],
    annual_income_estimate: u64,
    now: DateTime<Utc>,
) -> Vec<LifeEvent> {
    let role = profile.display_role();
    let mut events = Vec::new();

    // Job change / promotion
    let tenure = profile
        .position_start
        .as_option()
        .map(|start| tenure_months(start, now));
    match tenure {
        Some(months) if months <= 9 => events.push(event(
            LifeEventType::NewJobPromotion,
            Confidence::High,
            format!("Started current role about {} months ago", months),
        )),
        Some(months) if months <= 18 => events.push(event(
            LifeEventType::NewJobPromotion,
            Confidence::Medium,
            format!("Moved into current role within the last {} months", months),
        )),
        _ if classify::has_signal(role, RoleSignal::Senior) => events.push(event(
            LifeEventType::NewJobPromotion,
            Confidence::Low,
            "Senior title suggests a step up in responsibility".to_string(),
        )),
        _ => {}
    }

    // Responsibility
    if classify::has_signal(role, RoleSignal::Executive) {
        events.push(event(
            LifeEventType::HighResponsibilityRole,
            Confidence::High,
            "Executive role carries outsized financial responsibility".to_string(),
        ));
    } else if classify::has_signal(role, RoleSignal::Managerial) {
        events.push(event(
            LifeEventType::HighResponsibilityRole,
            Confidence::Medium,
            "Managerial role with people or budget responsibility".to_string(),
        ));
    }

    // Family formation
    let married = marital_status.is_some_and(|s| s.trim().eq_ignore_ascii_case("married"));
    let has_child = dependents.iter().any(|d| d.kind == DependentType::Child);
    let has_spouse = dependents.iter().any(|d| d.kind == DependentType::Spouse);
    let family_years = age_range.is_some_and(|a| FAMILY_FORMATION_YEARS.contains(&a.trim()));

    if married || has_child {
        events.push(event(
            LifeEventType::FamilyFormationStage,
            Confidence::High,
            "Household with a spouse or children relying on your income".to_string(),
        ));
    } else if family_years || has_spouse {
        events.push(event(
            LifeEventType::FamilyFormationStage,
            Confidence::Medium,
            "Age and household signals point to a family-building stage".to_string(),
        ));
    }

    // Income trajectory
    if annual_income_estimate >= 180_000 {
        events.push(event(
            LifeEventType::IncomeAcceleration,
            Confidence::High,
            "Estimated income is well above typical employer coverage caps".to_string(),
        ));
    } else if annual_income_estimate >= 120_000 {
        events.push(event(
            LifeEventType::IncomeAcceleration,
            Confidence::Medium,
            "Estimated income is outgrowing standard group coverage".to_string(),
        ));
    } else if profile
        .industry
        .as_deref()
        .is_some_and(classify::is_high_pay_industry)
    {
        events.push(event(
            LifeEventType::IncomeAcceleration,
            Confidence::Low,
            format!(
                "{} careers tend to see steep pay growth",
                profile.display_industry()
            ),
        ));
    }

    // Career risk
    if classify::has_signal(role, RoleSignal::Founder)
        || profile.company_size.as_option() == Some(&CompanySize::Startup)
    {
        events.push(event(
            LifeEventType::CareerRiskExposure,
            Confidence::High,
            "Founder or early-stage company: income and benefits are less certain".to_string(),
        ));
    } else if classify::has_signal(role, RoleSignal::Contractor) {
        events.push(event(
            LifeEventType::CareerRiskExposure,
            Confidence::Medium,
            "Contract or independent work rarely includes group life cover".to_string(),
        ));
    }

    rank_events(events)
}

fn event(kind: LifeEventType, confidence: Confidence, reason: String) -> LifeEvent {
    LifeEvent {
        kind,
        confidence,
        reason,
    }
}

/// Keeps the first event per type, orders by confidence (stable), caps the list.
pub fn rank_events(events: Vec<LifeEvent>) -> Vec<LifeEvent> {
    let mut seen = HashSet::new();
    let mut unique: Vec<LifeEvent> = events
        .into_iter()
        .filter(|e| seen.insert(e.kind))
        .collect();

    unique.sort_by(|a, b| b.confidence.rank().cmp(&a.confidence.rank()));
    unique.truncate(MAX_LIFE_EVENTS);
    unique
}
