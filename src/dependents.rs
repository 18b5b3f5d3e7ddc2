use crate::classify::{has_signal, RoleSignal};
use crate::models::{CompanySize, Dependent, DependentType, RiskWeight};

/// Age brackets in which young children are likely.
const PARENTING_YEARS: &[&str] = &["25-34", "30-39", "35-44", "40-49"];

/// Age brackets in which aging parents are likely to need support.
const AGING_PARENT_YEARS: &[&str] = &["45-54", "55-64"];

fn status_is(status: Option<&str>, expected: &str) -> bool {
    status.is_some_and(|s| s.trim().eq_ignore_ascii_case(expected))
}

fn age_in(age_range: Option<&str>, set: &[&str]) -> bool {
    age_range.is_some_and(|age| set.contains(&age.trim()))
}

/// Infers who relies on this person's income. Never returns an empty list.
pub fn infer_dependents(
    role: &str,
    company_size: CompanySize,
    age_range: Option<&str>,
    marital_status: Option<&str>,
) -> Vec<Dependent> {
    let mut dependents = Vec::new();
    let status_given = marital_status.is_some_and(|s| !s.trim().is_empty());
    let household_lead = has_signal(role, RoleSignal::HouseholdLead);

    if status_is(marital_status, "married") || (!status_given && household_lead) {
        dependents.push(Dependent {
            kind: DependentType::Spouse,
            label: "Spouse / Partner".to_string(),
            risk_weight: RiskWeight::High,
            context: "Shared household costs and long-term plans rely on your income"
                .to_string(),
        });
    }

    if age_in(age_range, PARENTING_YEARS)
        && household_lead
        && !status_is(marital_status, "single")
    {
        dependents.push(Dependent {
            kind: DependentType::Child,
            label: "Children".to_string(),
            risk_weight: RiskWeight::Critical,
            context: "Childcare, schooling and day-to-day costs through adulthood".to_string(),
        });
    }

    if age_in(age_range, AGING_PARENT_YEARS) {
        dependents.push(Dependent {
            kind: DependentType::Parent,
            label: "Aging Parent".to_string(),
            risk_weight: RiskWeight::Medium,
            context: "Parents approaching retirement may lean on you for care costs".to_string(),
        });
    }

    if has_signal(role, RoleSignal::BusinessOwner) && company_size != CompanySize::Startup {
        dependents.push(Dependent {
            kind: DependentType::BusinessDependent,
            label: "Business Partners & Employees".to_string(),
            risk_weight: RiskWeight::Medium,
            context: "Payroll and continuity depend on you staying in the business".to_string(),
        });
    }

    // Someone who says they are single has no partner to count on.
    if dependents.is_empty() {
        let kind = if status_is(marital_status, "single") {
            DependentType::Parent
        } else {
            DependentType::Spouse
        };
        dependents.push(Dependent {
            kind,
            label: "Household / Dependents".to_string(),
            risk_weight: RiskWeight::High,
            context: "Anyone who shares your household or relies on your paycheck".to_string(),
        });
    }

    dependents
}
