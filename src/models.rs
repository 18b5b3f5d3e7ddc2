use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============ Optional Values ============

/// Placeholders rendered for unknown text fields.
pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const DEFAULT_ROLE: &str = "Professional";
pub const DEFAULT_INDUSTRY: &str = "General";

const PLACEHOLDERS: [&str; 4] = ["unknown", "unknown company", "professional", "general"];

/// A value that is either known or explicitly unset.
///
/// Serializes as the inner value or `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Known(T),
    Unset,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> Field<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Field::Known(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Known(v) => Some(v),
            Field::Unset => None,
        }
    }

    /// Keeps `self` when known, otherwise takes `other`.
    pub fn or(self, other: Field<T>) -> Field<T> {
        match self {
            Field::Known(_) => self,
            Field::Unset => other,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Known(v),
            None => Field::Unset,
        }
    }
}

impl Field<String> {
    /// Normalizes free text: blank or placeholder strings become `Unset`.
    pub fn text(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || is_placeholder(trimmed) {
            Field::Unset
        } else {
            Field::Known(trimmed.to_string())
        }
    }

    pub fn opt_text(raw: Option<&str>) -> Self {
        raw.map(Field::text).unwrap_or_default()
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.as_option().map(String::as_str)
    }

    /// The known value, or the given placeholder.
    pub fn or_placeholder<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.as_deref().unwrap_or(placeholder)
    }
}

/// True for strings that stand in for "no data".
pub fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    lowered.is_empty() || PLACEHOLDERS.contains(&lowered.as_str())
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}

/// Reads free text through [`Field::text`], so placeholders arrive as `Unset`.
pub fn deserialize_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Field<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(Field::text)
        .unwrap_or_default())
}

fn serialize_or_unknown<S: Serializer>(
    field: &Field<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(field.or_placeholder(UNKNOWN))
}

fn serialize_or_unknown_company<S: Serializer>(
    field: &Field<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(field.or_placeholder(UNKNOWN_COMPANY))
}

fn serialize_or_default_role<S: Serializer>(
    field: &Field<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(field.or_placeholder(DEFAULT_ROLE))
}

fn serialize_or_default_industry<S: Serializer>(
    field: &Field<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(field.or_placeholder(DEFAULT_INDUSTRY))
}

// ============ Enriched Profile ============

/// Employer size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Startup,
    Small,
    Medium,
    Large,
    Enterprise,
}

impl CompanySize {
    /// Tier for a reported employee count.
    pub fn from_headcount(headcount: u64) -> Self {
        match headcount {
            0..=10 => CompanySize::Startup,
            11..=50 => CompanySize::Small,
            51..=1000 => CompanySize::Medium,
            1001..=10_000 => CompanySize::Large,
            _ => CompanySize::Enterprise,
        }
    }

    /// Tier for a range label such as `"51-200"` or `"10001+"`, keyed on its lower bound.
    pub fn from_headcount_range(range: &str) -> Option<Self> {
        let digits: String = range
            .trim()
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == ',')
            .filter(|c| *c != ',')
            .collect();
        digits.parse().ok().map(Self::from_headcount)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Startup => "startup",
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
            CompanySize::Enterprise => "enterprise",
        }
    }
}

/// Month/year the current position started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStart {
    /// 1-12 when reported.
    pub month: Option<u32>,
    pub year: i32,
}

/// Employer headquarters address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headquarters {
    pub region: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
}

/// Optional employer metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub domain: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub website: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub linkedin_url: Field<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_text")]
    pub company_type: Field<String>,
    #[serde(default)]
    pub year_founded: Field<i32>,
    #[serde(default)]
    pub headcount: Field<u64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub headcount_range: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Field<String>,
    #[serde(default)]
    pub headquarters: Field<Headquarters>,
}

/// Normalized person + employer snapshot built from external lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProfile {
    /// The email the lookup was keyed on.
    pub email: String,
    #[serde(
        default,
        serialize_with = "serialize_or_unknown",
        deserialize_with = "deserialize_text"
    )]
    pub name: Field<String>,
    #[serde(
        default,
        serialize_with = "serialize_or_unknown_company",
        deserialize_with = "deserialize_text"
    )]
    pub company: Field<String>,
    #[serde(
        default,
        serialize_with = "serialize_or_default_role",
        deserialize_with = "deserialize_text"
    )]
    pub role: Field<String>,
    #[serde(
        default,
        serialize_with = "serialize_or_default_industry",
        deserialize_with = "deserialize_text"
    )]
    pub industry: Field<String>,
    #[serde(default)]
    pub company_size: Field<CompanySize>,
    #[serde(
        default,
        serialize_with = "serialize_or_unknown",
        deserialize_with = "deserialize_text"
    )]
    pub location: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub linkedin_url: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub headline: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub summary: Field<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub position_description: Field<String>,
    #[serde(default)]
    pub position_start: Field<PositionStart>,
    #[serde(default, rename = "companyMeta")]
    pub company_details: CompanyDetails,
    #[serde(default)]
    pub work_emails: Vec<String>,
    #[serde(default)]
    pub personal_emails: Vec<String>,
    #[serde(default)]
    pub phones: Vec<String>,
    pub enriched_at: DateTime<Utc>,
    #[serde(default)]
    pub is_mocked: bool,
}

impl EnrichedProfile {
    /// A profile with nothing known beyond the email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Field::Unset,
            company: Field::Unset,
            role: Field::Unset,
            industry: Field::Unset,
            company_size: Field::Unset,
            location: Field::Unset,
            linkedin_url: Field::Unset,
            headline: Field::Unset,
            summary: Field::Unset,
            position_description: Field::Unset,
            position_start: Field::Unset,
            company_details: CompanyDetails::default(),
            work_emails: Vec::new(),
            personal_emails: Vec::new(),
            phones: Vec::new(),
            enriched_at: Utc::now(),
            is_mocked: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.or_placeholder(UNKNOWN)
    }

    pub fn display_company(&self) -> &str {
        self.company.or_placeholder(UNKNOWN_COMPANY)
    }

    pub fn display_role(&self) -> &str {
        self.role.or_placeholder(DEFAULT_ROLE)
    }

    pub fn display_industry(&self) -> &str {
        self.industry.or_placeholder(DEFAULT_INDUSTRY)
    }

    pub fn display_location(&self) -> &str {
        self.location.or_placeholder(UNKNOWN)
    }

    /// Size tier used by the heuristics; unknown employers count as medium.
    pub fn effective_company_size(&self) -> CompanySize {
        self.company_size
            .as_option()
            .copied()
            .unwrap_or(CompanySize::Medium)
    }
}

// ============ Inference Outputs ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependentType {
    Spouse,
    Child,
    Parent,
    BusinessDependent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskWeight {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskWeight {
    /// Share of household income exposed per dependent of this weight.
    pub fn coefficient(&self) -> f64 {
        match self {
            RiskWeight::Critical => 0.8,
            RiskWeight::High => 0.6,
            RiskWeight::Medium => 0.4,
            RiskWeight::Low => 0.2,
        }
    }
}

/// Someone financially reliant on the person's income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependent {
    #[serde(rename = "type")]
    pub kind: DependentType,
    pub label: String,
    pub risk_weight: RiskWeight,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventType {
    NewJobPromotion,
    HighResponsibilityRole,
    FamilyFormationStage,
    IncomeAcceleration,
    CareerRiskExposure,
}

/// Three-level certainty used by life events and the overall profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Higher is more certain.
    pub fn rank(&self) -> u8 {
        match self {
            Confidence::High => 3,
            Confidence::Medium => 2,
            Confidence::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEvent {
    #[serde(rename = "type")]
    pub kind: LifeEventType,
    pub confidence: Confidence,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLabel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextStep {
    Education,
    Conversation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messaging {
    pub score_label: ScoreLabel,
    pub score_explanation: String,
    pub what_changed: String,
    pub why_now: String,
    pub next_step: NextStep,
    pub next_step_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageDecisioning {
    pub life_events: Vec<LifeEvent>,
    /// 0-100.
    pub coverage_confidence_score: u8,
    pub drivers: Vec<String>,
    pub messaging: Messaging,
}

// ============ Impact Map ============

/// Headline identity block shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: String,
    pub company: String,
    pub location: String,
}

/// Full financial-risk profile for one email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMap {
    pub person: Person,
    pub enriched_profile: EnrichedProfile,
    pub income_band: String,
    pub annual_income_estimate: u64,
    pub dependents: Vec<Dependent>,
    pub estimated_annual_exposure: String,
    pub recommended_coverage_range: String,
    pub confidence_level: Confidence,
    pub explanation: String,
    pub decisioning: CoverageDecisioning,
}

// ============ API Request Models ============

/// Request payload for building an impact map.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMapRequest {
    pub email: String,
    /// Self-reported bracket such as `"30-39"`.
    #[serde(default)]
    pub age_range: Option<String>,
    /// `"single"`, `"married"`, ...
    #[serde(default)]
    pub marital_status: Option<String>,
}

/// Request payload for enrichment only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichRequest {
    pub email: String,
}
