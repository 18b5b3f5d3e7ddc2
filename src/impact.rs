//! Impact map assembly and the service interface transports call into.

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::config::{Config, EnrichmentMode};
use crate::dependents::infer_dependents;
use crate::enrichment::EnrichmentClient;
use crate::errors::AppError;
use crate::exposure::{calculate_exposure, calculate_recommended_coverage};
use crate::income::{estimate_income_band, income_band_to_number};
use crate::life_events::detect_life_events_at;
use crate::mock_enricher::MockEnricher;
use crate::models::{Confidence, EnrichedProfile, ImpactMap, Person};
use crate::scoring::build_coverage_decisioning;

/// Anything that can turn an email into an enriched profile.
pub trait ProfileEnricher: Send + Sync {
    fn enrich_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<EnrichedProfile, AppError>> + Send;
}

impl ProfileEnricher for EnrichmentClient {
    fn enrich_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<EnrichedProfile, AppError>> + Send {
        EnrichmentClient::enrich_email(self, email)
    }
}

impl ProfileEnricher for MockEnricher {
    fn enrich_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<EnrichedProfile, AppError>> + Send {
        MockEnricher::enrich_email(self, email)
    }
}

/// Enricher picked from configuration.
#[derive(Clone)]
pub enum Enricher {
    Live(EnrichmentClient),
    Mock(MockEnricher),
}

impl Enricher {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(match config.enrichment_mode {
            EnrichmentMode::Live => Enricher::Live(EnrichmentClient::new(config)?),
            EnrichmentMode::Mock => Enricher::Mock(MockEnricher),
        })
    }
}

impl ProfileEnricher for Enricher {
    async fn enrich_email(&self, email: &str) -> Result<EnrichedProfile, AppError> {
        match self {
            Enricher::Live(client) => client.enrich_email(email).await,
            Enricher::Mock(mock) => mock.enrich_email(email).await,
        }
    }
}

fn clean_input(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// How much real signal the profile carries.
pub fn confidence_level(profile: &EnrichedProfile) -> Confidence {
    let signals = [
        profile.role.is_known(),
        profile.industry.is_known(),
        profile.location.is_known(),
        profile.company_size.is_known(),
        profile.linkedin_url.is_known() || profile.headline.is_known(),
    ]
    .into_iter()
    .filter(|known| *known)
    .count();

    if profile.role.is_known() && signals >= 4 {
        Confidence::High
    } else if profile.role.is_known() || signals >= 2 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn explanation(
    profile: &EnrichedProfile,
    income_band: &str,
    dependent_count: usize,
    confidence: Confidence,
) -> String {
    let industry = profile
        .industry
        .as_deref()
        .map(|i| format!(" in {}", i))
        .unwrap_or_default();
    let location = profile
        .location
        .as_deref()
        .map(|l| format!(", based in {}", l))
        .unwrap_or_default();
    let caveat = match confidence {
        Confidence::High => "Public profile data was detailed enough for a close estimate.",
        Confidence::Medium => "Some profile details were missing, so treat this as a range.",
        Confidence::Low => {
            "Little public data was found, so this estimate leans on general patterns."
        }
    };

    format!(
        "As a {} at a {} company{}{}, your household income likely falls in the {} band with {} group{} relying on it. {}",
        profile.display_role(),
        profile.effective_company_size().as_str(),
        industry,
        location,
        income_band,
        dependent_count,
        if dependent_count == 1 { "" } else { "s" },
        caveat
    )
}

/// Builds the impact map for an already enriched profile.
pub fn infer_impact_map(
    profile: EnrichedProfile,
    age_range: Option<&str>,
    marital_status: Option<&str>,
) -> ImpactMap {
    infer_impact_map_at(profile, age_range, marital_status, Utc::now())
}

/// [`infer_impact_map`] with a fixed clock for tenure calculations.
pub fn infer_impact_map_at(
    profile: EnrichedProfile,
    age_range: Option<&str>,
    marital_status: Option<&str>,
    now: DateTime<Utc>,
) -> ImpactMap {
    let age_range = clean_input(age_range);
    let marital_status = clean_input(marital_status);

    let role = profile.display_role();
    let company_size = profile.effective_company_size();

    let income_band = estimate_income_band(
        role,
        company_size,
        profile.industry.as_deref(),
        profile.location.as_deref(),
    );
    let annual_income_estimate = income_band_to_number(income_band);

    let dependents = infer_dependents(role, company_size, age_range, marital_status);
    let estimated_annual_exposure = calculate_exposure(annual_income_estimate, &dependents);
    let recommended_coverage_range =
        calculate_recommended_coverage(annual_income_estimate, &dependents);

    let life_events = detect_life_events_at(
        &profile,
        age_range,
        marital_status,
        &dependents,
        annual_income_estimate,
        now,
    );
    let decisioning = build_coverage_decisioning(
        &profile,
        annual_income_estimate,
        &dependents,
        &life_events,
        &recommended_coverage_range,
    );

    let confidence_level = confidence_level(&profile);
    let explanation = explanation(&profile, income_band, dependents.len(), confidence_level);

    ImpactMap {
        person: Person {
            name: profile.display_name().to_string(),
            role: profile.display_role().to_string(),
            company: profile.display_company().to_string(),
            location: profile.display_location().to_string(),
        },
        enriched_profile: profile,
        income_band: income_band.to_string(),
        annual_income_estimate,
        dependents,
        estimated_annual_exposure,
        recommended_coverage_range,
        confidence_level,
        explanation,
        decisioning,
    }
}

/// The one business-logic entry point shared by every transport.
#[derive(Clone)]
pub struct ImpactService<E> {
    enricher: E,
}

impl<E: ProfileEnricher> ImpactService<E> {
    pub fn new(enricher: E) -> Self {
        Self { enricher }
    }

    pub async fn enrich_email(&self, email: &str) -> Result<EnrichedProfile, AppError> {
        self.enricher.enrich_email(email).await
    }

    /// Enriches the email, then infers the impact map from the profile.
    pub async fn produce_impact_map(
        &self,
        email: &str,
        age_range: Option<&str>,
        marital_status: Option<&str>,
    ) -> Result<ImpactMap, AppError> {
        let profile = self.enricher.enrich_email(email).await?;
        Ok(infer_impact_map(profile, age_range, marital_status))
    }
}
