use chrono::Utc;
use std::collections::HashSet;

use crate::models::{CompanyDetails, EnrichedProfile};

/// Case-insensitive union of two lists: base entries first, blanks dropped.
pub fn union_case_insensitive(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    base.iter()
        .chain(overlay.iter())
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.trim().to_lowercase()))
        .cloned()
        .collect()
}

fn merge_company(base: CompanyDetails, overlay: CompanyDetails) -> CompanyDetails {
    CompanyDetails {
        domain: base.domain.or(overlay.domain),
        website: base.website.or(overlay.website),
        linkedin_url: base.linkedin_url.or(overlay.linkedin_url),
        company_type: base.company_type.or(overlay.company_type),
        year_founded: base.year_founded.or(overlay.year_founded),
        headcount: base.headcount.or(overlay.headcount),
        headcount_range: base.headcount_range.or(overlay.headcount_range),
        description: base.description.or(overlay.description),
        headquarters: base.headquarters.or(overlay.headquarters),
    }
}

/// Folds `overlay` into `base`.
///
/// Base values win; an overlay value is only adopted where base is unset.
/// List fields are unioned. The result is stamped with the merge time and is
/// never marked as mocked.
pub fn merge_profiles(base: EnrichedProfile, overlay: EnrichedProfile) -> EnrichedProfile {
    EnrichedProfile {
        email: if base.email.trim().is_empty() {
            overlay.email
        } else {
            base.email
        },
        name: base.name.or(overlay.name),
        company: base.company.or(overlay.company),
        role: base.role.or(overlay.role),
        industry: base.industry.or(overlay.industry),
        company_size: base.company_size.or(overlay.company_size),
        location: base.location.or(overlay.location),
        linkedin_url: base.linkedin_url.or(overlay.linkedin_url),
        headline: base.headline.or(overlay.headline),
        summary: base.summary.or(overlay.summary),
        position_description: base.position_description.or(overlay.position_description),
        position_start: base.position_start.or(overlay.position_start),
        company_details: merge_company(base.company_details, overlay.company_details),
        work_emails: union_case_insensitive(&base.work_emails, &overlay.work_emails),
        personal_emails: union_case_insensitive(&base.personal_emails, &overlay.personal_emails),
        phones: union_case_insensitive(&base.phones, &overlay.phones),
        enriched_at: Utc::now(),
        is_mocked: false,
    }
}
