//! Offline enricher for local development.

use crate::enrichment::{email_fingerprint, profile_from_contact};
use crate::errors::AppError;
use crate::models::EnrichedProfile;

/// Builds profiles from the email alone, without calling the provider.
#[derive(Debug, Clone, Default)]
pub struct MockEnricher;

impl MockEnricher {
    pub async fn enrich_email(&self, email: &str) -> Result<EnrichedProfile, AppError> {
        tracing::debug!("Mock enrichment for subject {}", email_fingerprint(email));
        let mut profile = profile_from_contact(email, None, true);
        profile.is_mocked = true;
        Ok(profile)
    }
}
