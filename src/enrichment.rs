/// Email enrichment against the external contact provider
///
/// The workflow for one email:
/// 1. Reverse lookup keyed by the email (submit, then poll)
/// 2. Contact enrichment by LinkedIn URL, or by name/domain guessed from the email
/// 3. Merge stage 2 onto stage 1
///
/// Stage 1 failures abort the call. Stage 2 failures are logged and the stage 1
/// profile is returned unchanged.
use crate::config::{ApiKeySource, Config, PollPolicy};
use crate::errors::{AppError, Stage};
use crate::merge::{merge_profiles, union_case_insensitive};
use crate::models::{CompanyDetails, CompanySize, EnrichedProfile, Field, Headquarters, PositionStart};
use crate::provider_models::{
    industry_text, location_text, value_as_u64, Contact, ContactPoint, JobResult, RawCompany,
    SubmitResponse,
};
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use std::time::Duration;
use uuid::Uuid;

const REVERSE_LOOKUP_PATH: &str = "/contact/reverse/email/bulk";
const CONTACT_ENRICH_PATH: &str = "/contact/enrich/bulk";

/// Domains whose label says nothing about an employer.
const FREE_MAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "msn.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "proton.me",
    "protonmail.com",
    "gmx.com",
    "mail.com",
    "yandex.com",
    "zoho.com",
];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Validate email address
///
/// Checks for:
/// - Basic email format (contains @ and .)
/// - Minimum length requirements
/// - Valid domain structure
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    if !EMAIL_REGEX.is_match(email) {
        tracing::warn!("❌ Invalid email format: {}", email_fingerprint(email));
        return false;
    }

    true
}

/// Short stable identifier for an email, safe to log.
pub fn email_fingerprint(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    hex::encode(&digest[..6])
}

fn split_email(email: &str) -> Option<(&str, &str)> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some((local, domain))
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Name tokens from the email local part: `"john.doe+news"` -> `["John", "Doe", "News"]`.
pub fn name_tokens(email: &str) -> Vec<String> {
    let Some((local, _)) = split_email(email) else {
        return Vec::new();
    };
    local
        .split(|c: char| matches!(c, '.' | '_' | '-' | '+') || c.is_ascii_digit())
        .filter(|t| !t.is_empty())
        .map(capitalize)
        .collect()
}

/// Best-guess display name from the email local part.
pub fn derive_name(email: &str) -> Field<String> {
    Field::text(name_tokens(email).join(" "))
}

/// Best-guess company from the email domain: `"acme.com"` -> `"ACME"`.
pub fn company_guess(email: &str) -> Option<String> {
    let (_, domain) = split_email(email)?;
    let domain = domain.to_lowercase();
    if FREE_MAIL_DOMAINS.contains(&domain.as_str()) {
        return None;
    }
    domain
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_uppercase)
}

fn email_domain(email: &str) -> Option<String> {
    split_email(email).map(|(_, domain)| domain.to_lowercase())
}

/// Canonical `https://www.linkedin.com/...` form of a LinkedIn profile URL.
pub fn normalize_linkedin_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let parsed = url::Url::parse(&with_scheme).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if host != "linkedin.com" && !host.ends_with(".linkedin.com") {
        return None;
    }
    let path = parsed.path().trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("https://www.linkedin.com{}", path))
}

fn points(values: &[ContactPoint]) -> Vec<String> {
    let raw: Vec<String> = values
        .iter()
        .filter_map(ContactPoint::value)
        .map(|v| v.trim().to_string())
        .collect();
    union_case_insensitive(&raw, &[])
}

fn company_details(company: &RawCompany) -> CompanyDetails {
    let headquarters = company.headquarters.as_ref().map(|hq| Headquarters {
        region: hq.region.clone(),
        city: hq.city.clone(),
        country: hq.country.clone(),
        country_code: hq.country_code.clone(),
        postal_code: hq.postal_code.clone(),
        address_line1: hq.address_line_1.clone(),
        address_line2: hq.address_line_2.clone(),
    });

    CompanyDetails {
        domain: Field::opt_text(company.domain.as_deref()),
        website: Field::opt_text(company.website.as_deref()),
        linkedin_url: Field::opt_text(company.linkedin_url.as_deref()),
        company_type: Field::opt_text(company.company_type.as_deref()),
        year_founded: company
            .year_founded
            .as_ref()
            .and_then(value_as_u64)
            .map(|y| y as i32)
            .into(),
        headcount: company.headcount.as_ref().and_then(value_as_u64).into(),
        headcount_range: Field::opt_text(company.headcount_range.as_deref()),
        description: Field::opt_text(company.description.as_deref()),
        headquarters: headquarters
            .filter(|hq| *hq != Headquarters::default())
            .into(),
    }
}

/// Maps a provider contact onto a profile.
///
/// With `derive_fallbacks`, a missing name and company are guessed from the
/// email itself.
pub fn profile_from_contact(
    email: &str,
    contact: Option<&Contact>,
    derive_fallbacks: bool,
) -> EnrichedProfile {
    let mut profile = EnrichedProfile::new(email.trim());

    if let Some(contact) = contact {
        if let Some(raw) = contact.profile.as_ref() {
            let full_name = raw.full_name.clone().unwrap_or_else(|| {
                [raw.firstname.as_deref(), raw.lastname.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            });
            profile.name = Field::text(full_name);
            profile.headline = Field::opt_text(raw.headline.as_deref());
            profile.summary = Field::opt_text(raw.summary.as_deref());
            profile.location = Field::opt_text(raw.location.as_ref().and_then(location_text).as_deref());
            profile.linkedin_url = raw
                .linkedin_url
                .as_deref()
                .and_then(normalize_linkedin_url)
                .or_else(|| {
                    raw.public_identifier
                        .as_deref()
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(|id| format!("https://www.linkedin.com/in/{}", id))
                })
                .into();

            if let Some(position) = raw.position.as_ref() {
                profile.role = Field::opt_text(position.title.as_deref());
                profile.position_description = Field::opt_text(position.description.as_deref());
                profile.position_start = position
                    .start_at
                    .as_ref()
                    .and_then(|d| {
                        d.year.map(|year| PositionStart {
                            month: d.month.filter(|m| (1..=12).contains(m)),
                            year,
                        })
                    })
                    .into();

                if let Some(company) = position.company.as_ref() {
                    profile.company = Field::opt_text(company.name.as_deref());
                    profile.industry =
                        Field::opt_text(company.industry.as_ref().and_then(industry_text).as_deref());
                    profile.company_details = company_details(company);
                    profile.company_size = company
                        .headcount
                        .as_ref()
                        .and_then(value_as_u64)
                        .map(CompanySize::from_headcount)
                        .or_else(|| {
                            company
                                .headcount_range
                                .as_deref()
                                .and_then(CompanySize::from_headcount_range)
                        })
                        .into();
                }
            }
        }

        profile.work_emails = points(&contact.emails);
        profile.personal_emails = points(&contact.personal_emails);
        profile.phones = points(&contact.phones);
    }

    if derive_fallbacks {
        if !profile.name.is_known() {
            profile.name = derive_name(email);
        }
        if !profile.company.is_known() {
            profile.company = company_guess(email).into();
        }
    }

    profile
}

/// Request body for the contact-enrichment stage, or `None` when there is
/// nothing to identify the person by.
pub fn contact_enrichment_request(email: &str, stage_one: &EnrichedProfile) -> Option<Value> {
    let enrich_fields = json!(["contact.emails", "contact.personal_emails", "contact.phones"]);

    let record = if let Some(linkedin_url) = stage_one.linkedin_url.as_deref() {
        json!({
            "linkedin_url": linkedin_url,
            "enrich_fields": enrich_fields,
        })
    } else {
        let tokens = name_tokens(email);
        let (firstname, rest) = tokens.split_first()?;
        let mut record = json!({
            "firstname": firstname,
            "lastname": rest.join(" "),
            "enrich_fields": enrich_fields,
        });
        if let Some(company_name) = company_guess(email) {
            record["domain"] = json!(email_domain(email));
            record["company_name"] = json!(company_name);
        }
        record
    };

    Some(json!({
        "name": job_name(),
        "datas": [record],
    }))
}

fn job_name() -> String {
    format!("impact-map-{}", Uuid::new_v4())
}

/// Best-effort message from a provider error body.
pub fn failure_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .and_then(|m| m.as_str())
            .or_else(|| v.get("error").and_then(|e| e.as_str()))
            .or_else(|| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
            })
            .map(String::from)
    });

    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("enrichment provider returned status {}", status.as_u16()))
}

/// Client for the contact provider's bulk job endpoints.
#[derive(Clone)]
pub struct EnrichmentClient {
    client: Client,
    base_url: String,
    api_key: ApiKeySource,
    poll: PollPolicy,
}

impl EnrichmentClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_settings(
            config.enrichment_base_url.clone(),
            ApiKeySource::default(),
            config.poll,
        )
    }

    pub fn with_settings(
        base_url: impl Into<String>,
        api_key: ApiKeySource,
        poll: PollPolicy,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create enrichment client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            poll,
        })
    }

    /// Runs both lookup stages for `email` and returns the merged profile.
    pub async fn enrich_email(&self, email: &str) -> Result<EnrichedProfile, AppError> {
        let api_key = self.api_key.resolve()?;
        let subject = email_fingerprint(email);

        tracing::info!("Step 1: reverse lookup for subject {}", subject);
        let body = json!({
            "name": job_name(),
            "data": [{ "email": email.trim() }],
        });
        let stage_one = self
            .run_job(&api_key, Stage::ReverseLookup, REVERSE_LOOKUP_PATH, &body)
            .await?;
        let base = profile_from_contact(email, stage_one.first_contact(), true);

        tracing::info!("Step 2: contact enrichment for subject {}", subject);
        let Some(body) = contact_enrichment_request(email, &base) else {
            tracing::warn!(
                "⚠ No LinkedIn URL or name tokens for subject {}, skipping contact enrichment",
                subject
            );
            return Ok(base);
        };

        match self
            .run_job(&api_key, Stage::ContactEnrichment, CONTACT_ENRICH_PATH, &body)
            .await
        {
            Ok(stage_two) => {
                let overlay = profile_from_contact(email, stage_two.first_contact(), false);
                tracing::info!("✓ Enrichment complete for subject {}", subject);
                Ok(merge_profiles(base, overlay))
            }
            Err(e) => {
                tracing::warn!(
                    "⚠ Contact enrichment failed for subject {}, keeping reverse lookup profile: {}",
                    subject,
                    e
                );
                Ok(base)
            }
        }
    }

    /// Submits a job and polls it until it settles or the budget runs out.
    async fn run_job(
        &self,
        api_key: &str,
        stage: Stage,
        path: &str,
        body: &Value,
    ) -> Result<JobResult, AppError> {
        let job_id = self.submit(api_key, stage, path, body).await?;
        let url = format!("{}{}/{}", self.base_url, path, job_id);

        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(self.poll.interval).await;
            let result = self.fetch_job(api_key, stage, &url).await?;
            tracing::debug!(
                "{} job {} poll {}/{}: {:?}",
                stage,
                job_id,
                attempt,
                self.poll.max_attempts,
                result.status
            );
            if result.status.is_terminal() {
                return Ok(result);
            }
        }

        let result = self.fetch_job(api_key, stage, &url).await?;
        if !result.status.is_terminal() {
            tracing::warn!(
                "{} job {} still {:?} after {} polls, using last response",
                stage,
                job_id,
                result.status,
                self.poll.max_attempts
            );
        }
        Ok(result)
    }

    async fn submit(
        &self,
        api_key: &str,
        stage: Stage,
        path: &str,
        body: &Value,
    ) -> Result<String, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::stage(stage, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("{} submit returned {}", stage, status);
            return Err(AppError::stage(stage, failure_message(status, &error_text)));
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| AppError::stage(stage, format!("malformed submit response: {}", e)))?;

        tracing::debug!("{} job submitted: {}", stage, submitted.enrichment_id);
        Ok(submitted.enrichment_id)
    }

    async fn fetch_job(&self, api_key: &str, stage: Stage, url: &str) -> Result<JobResult, AppError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
            .map_err(|e| AppError::stage(stage, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("{} poll returned {}", stage, status);
            return Err(AppError::stage(stage, failure_message(status, &error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::stage(stage, format!("malformed poll response: {}", e)))
    }
}
