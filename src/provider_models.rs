use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answer to a bulk job submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitResponse {
    pub enrichment_id: String,
}

/// Lifecycle state of a bulk job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Created,
    InProgress,
    Finished,
    Canceled,
    CreditsInsufficient,
    RateLimit,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Polling stops once a job reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Finished | JobStatus::Canceled | JobStatus::CreditsInsufficient
        )
    }
}

/// Poll answer for either bulk endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "unknown_status")]
    pub status: JobStatus,
    #[serde(default)]
    pub datas: Vec<JobRecord>,
}

fn unknown_status() -> JobStatus {
    JobStatus::Unknown
}

impl JobResult {
    /// The first returned contact, if the job produced any.
    pub fn first_contact(&self) -> Option<&Contact> {
        self.datas.iter().find_map(|record| record.contact.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobRecord {
    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Contact {
    #[serde(default)]
    pub profile: Option<RawProfile>,
    #[serde(default)]
    pub emails: Vec<ContactPoint>,
    #[serde(default)]
    pub personal_emails: Vec<ContactPoint>,
    #[serde(default)]
    pub phones: Vec<ContactPoint>,
}

/// An email or phone entry; the provider sends either bare strings or objects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ContactPoint {
    Plain(String),
    Detailed {
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        number: Option<String>,
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
}

impl ContactPoint {
    pub fn value(&self) -> Option<&str> {
        match self {
            ContactPoint::Plain(s) => Some(s.as_str()),
            ContactPoint::Detailed {
                email,
                number,
                phone,
                value,
            } => email
                .as_deref()
                .or(number.as_deref())
                .or(phone.as_deref())
                .or(value.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, alias = "first_name")]
    pub firstname: Option<String>,
    #[serde(default, alias = "last_name")]
    pub lastname: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// A string or an object with city/region/country.
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub position: Option<RawPosition>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPosition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_at: Option<RawDate>,
    #[serde(default)]
    pub company: Option<RawCompany>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDate {
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    /// A string or an object with `main_industry`.
    #[serde(default)]
    pub industry: Option<Value>,
    #[serde(default, rename = "type")]
    pub company_type: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    pub year_founded: Option<Value>,
    /// Number or numeric string.
    #[serde(default)]
    pub headcount: Option<Value>,
    #[serde(default)]
    pub headcount_range: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headquarters: Option<RawHeadquarters>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawHeadquarters {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub address_line_1: Option<String>,
    #[serde(default)]
    pub address_line_2: Option<String>,
}

/// Reads a number that may arrive as JSON number or numeric string.
pub fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// Flattens a location string or `{city, region, country}` object.
pub fn location_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            let parts: Vec<&str> = ["city", "region", "country"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// Reads an industry string or `{main_industry}` object.
pub fn industry_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("main_industry")
            .or_else(|| map.get("name"))
            .and_then(|v| v.as_str())
            .map(String::from),
        _ => None,
    }
}
