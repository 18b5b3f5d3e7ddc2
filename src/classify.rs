//! Keyword rule tables for free-text role, industry and location fields.
//!
//! Every classifier is an ordered list of `(keywords -> outcome)` rules. Matching
//! is case-insensitive on whole words, so `"cto"` does not fire inside
//! `"director"`. Rules are compiled once on first use.

use regex::Regex;
use std::sync::LazyLock;

/// A compiled whole-word, case-insensitive keyword alternation.
#[derive(Debug)]
pub struct KeywordSet {
    keywords: &'static [&'static str],
    pattern: Regex,
}

impl KeywordSet {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
            .expect("escaped keyword alternation is a valid pattern");
        Self { keywords, pattern }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }
}

/// One `(keywords -> outcome)` entry of a classifier.
#[derive(Debug)]
pub struct Rule<T> {
    pub keywords: KeywordSet,
    pub outcome: T,
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug)]
pub struct Classifier<T> {
    rules: Vec<Rule<T>>,
}

impl<T: Copy> Classifier<T> {
    pub fn new(table: &[(&'static [&'static str], T)]) -> Self {
        Self {
            rules: table
                .iter()
                .map(|(keywords, outcome)| Rule {
                    keywords: KeywordSet::new(keywords),
                    outcome: *outcome,
                })
                .collect(),
        }
    }

    /// Outcome of the first matching rule.
    pub fn classify(&self, text: &str) -> Option<T> {
        self.rules
            .iter()
            .find(|rule| rule.keywords.matches(text))
            .map(|rule| rule.outcome)
    }

    /// Outcomes of every matching rule, in table order.
    pub fn classify_all(&self, text: &str) -> Vec<T> {
        self.rules
            .iter()
            .filter(|rule| rule.keywords.matches(text))
            .map(|rule| rule.outcome)
            .collect()
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }
}

// ============ Role Tier ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTier {
    Executive,
    Senior,
    Regular,
}

const EXECUTIVE_KEYWORDS: &[&str] = &[
    "chief",
    "ceo",
    "cto",
    "cfo",
    "coo",
    "cio",
    "cmo",
    "cpo",
    "founder",
    "co-founder",
    "cofounder",
    "owner",
    "president",
    "vp",
    "svp",
    "evp",
    "vice president",
    "partner",
    "managing director",
    "head of",
];

const SENIOR_KEYWORDS: &[&str] = &[
    "senior",
    "sr",
    "lead",
    "principal",
    "staff",
    "director",
    "manager",
    "architect",
    "supervisor",
];

static ROLE_TIERS: LazyLock<Classifier<RoleTier>> = LazyLock::new(|| {
    Classifier::new(&[
        (EXECUTIVE_KEYWORDS, RoleTier::Executive),
        (SENIOR_KEYWORDS, RoleTier::Senior),
    ])
});

pub fn role_tier(role: &str) -> RoleTier {
    ROLE_TIERS.classify(role).unwrap_or(RoleTier::Regular)
}

pub fn role_tier_rules() -> &'static Classifier<RoleTier> {
    &ROLE_TIERS
}

// ============ Industry Pay ============

const HIGH_PAY_INDUSTRIES: &[&str] = &[
    "software",
    "saas",
    "technology",
    "tech",
    "information technology",
    "internet",
    "fintech",
    "finance",
    "financial",
    "financial services",
    "banking",
    "investment banking",
    "investment management",
    "venture capital",
    "private equity",
    "hedge fund",
    "capital markets",
    "consulting",
    "management consulting",
    "legal",
    "law practice",
    "biotech",
    "biotechnology",
    "pharmaceuticals",
    "semiconductors",
    "insurance",
];

const LOW_PAY_INDUSTRIES: &[&str] = &[
    "nonprofit",
    "non-profit",
    "nonprofit organization management",
    "education",
    "higher education",
    "primary/secondary education",
    "e-learning",
    "retail",
    "hospitality",
    "restaurants",
    "food & beverages",
    "government",
    "government administration",
    "public sector",
    "religious institutions",
    "individual & family services",
    "civic & social organization",
    "libraries",
    "museums",
    "arts",
];

static INDUSTRY_PAY: LazyLock<Classifier<i32>> = LazyLock::new(|| {
    Classifier::new(&[(HIGH_PAY_INDUSTRIES, 1), (LOW_PAY_INDUSTRIES, -1)])
});

/// Band shift implied by the industry: +1 for high-pay matches, -1 for low-pay
/// matches, applied independently.
pub fn industry_pay_shift(industry: &str) -> i32 {
    INDUSTRY_PAY.classify_all(industry).into_iter().sum()
}

pub fn is_high_pay_industry(industry: &str) -> bool {
    INDUSTRY_PAY.classify_all(industry).contains(&1)
}

// ============ Cost Of Living ============

const HIGH_COST_LOCATIONS: &[&str] = &[
    "new york",
    "nyc",
    "manhattan",
    "brooklyn",
    "san francisco",
    "bay area",
    "silicon valley",
    "san jose",
    "palo alto",
    "mountain view",
    "menlo park",
    "oakland",
    "los angeles",
    "seattle",
    "boston",
    "washington, dc",
    "washington dc",
    "london",
    "zurich",
    "geneva",
    "singapore",
    "hong kong",
];

static HIGH_COST: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(HIGH_COST_LOCATIONS));

pub fn is_high_cost_location(location: &str) -> bool {
    HIGH_COST.matches(location)
}

// ============ Role Signals ============

/// Role traits read by dependent inference and life-event detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSignal {
    /// Same keywords as the executive income tier.
    Executive,
    /// manager / senior / director: likely heading a household.
    HouseholdLead,
    /// ceo / founder / owner: others depend on the business.
    BusinessOwner,
    Founder,
    Managerial,
    /// Seniority fallback for promotion detection.
    Senior,
    Contractor,
}

const ROLE_SIGNAL_TABLE: &[(RoleSignal, &[&str])] = &[
    (RoleSignal::Executive, EXECUTIVE_KEYWORDS),
    (RoleSignal::HouseholdLead, &["manager", "senior", "director"]),
    (
        RoleSignal::BusinessOwner,
        &["ceo", "founder", "co-founder", "cofounder", "owner"],
    ),
    (RoleSignal::Founder, &["founder", "co-founder", "cofounder"]),
    (
        RoleSignal::Managerial,
        &["manager", "director", "head", "lead", "supervisor", "principal"],
    ),
    (
        RoleSignal::Senior,
        &[
            "senior", "sr", "lead", "principal", "staff", "manager", "director", "head", "vp",
        ],
    ),
    (
        RoleSignal::Contractor,
        &[
            "contractor",
            "contract",
            "freelance",
            "freelancer",
            "consultant",
            "self-employed",
            "independent",
        ],
    ),
];

static ROLE_SIGNALS: LazyLock<Vec<(RoleSignal, KeywordSet)>> = LazyLock::new(|| {
    ROLE_SIGNAL_TABLE
        .iter()
        .map(|(signal, keywords)| (*signal, KeywordSet::new(keywords)))
        .collect()
});

pub fn has_signal(role: &str, signal: RoleSignal) -> bool {
    ROLE_SIGNALS
        .iter()
        .any(|(s, keywords)| *s == signal && keywords.matches(role))
}

/// Every signal the role carries, in table order.
pub fn role_signals(role: &str) -> Vec<RoleSignal> {
    ROLE_SIGNALS
        .iter()
        .filter(|(_, keywords)| keywords.matches(role))
        .map(|(signal, _)| *signal)
        .collect()
}
