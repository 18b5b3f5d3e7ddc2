use crate::models::{
    CompanySize, Confidence, CoverageDecisioning, Dependent, DependentType, EnrichedProfile,
    LifeEvent, Messaging, NextStep, ScoreLabel,
};

/// Starting point: most people carry some workplace cover already.
const BASE_SCORE: f64 = 78.0;
const CHILD_DEDUCTION: f64 = 18.0;
const SPOUSE_DEDUCTION: f64 = 10.0;
const MOMENTUM_CAP: f64 = 14.0;
const GAP_WEIGHT: f64 = 35.0;
const MAX_DRIVERS: usize = 3;

pub const DRIVER_DEPENDENTS: &str = "dependents inferred without confirmed coverage";
pub const DRIVER_GAP: &str = "income replacement gap vs. typical employer coverage";
pub const DRIVER_MOMENTUM: &str = "high life-event momentum";
pub const DRIVER_DEFAULT: &str = "profile signals broadly in line with typical coverage";

/// Parses a single money amount such as `"$1.2M"`, `"850K"` or `"$1,500,000"`.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('+')
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    let (number, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        'b' | 'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    number.parse::<f64>().ok().map(|n| n * multiplier)
}

/// Midpoint of a `"$low – $high"` range, or the value itself for a single amount.
pub fn parse_coverage_midpoint(range: &str) -> Option<f64> {
    let sides: Vec<&str> = range
        .split(['–', '—'])
        .flat_map(|part| part.split(" - "))
        .filter(|s| !s.trim().is_empty())
        .collect();

    match sides.as_slice() {
        [single] => parse_amount(single),
        [low, high, ..] => Some((parse_amount(low)? + parse_amount(high)?) / 2.0),
        [] => None,
    }
}

/// Cover a typical employer already provides, as a multiple of salary.
pub fn employer_coverage_multiple(size: CompanySize) -> f64 {
    match size {
        CompanySize::Enterprise | CompanySize::Large => 1.0,
        CompanySize::Medium => 0.75,
        CompanySize::Small => 0.5,
        CompanySize::Startup => 0.35,
    }
}

fn confidence_weight(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => 2.0,
        Confidence::Medium => 1.0,
        Confidence::Low => 0.5,
    }
}

/// Deduction for recent life changes, capped.
pub fn momentum_deduction(life_events: &[LifeEvent]) -> f64 {
    let total: f64 = life_events
        .iter()
        .map(|e| confidence_weight(e.confidence))
        .sum();
    (total * 2.0).round().min(MOMENTUM_CAP)
}

struct ScoreInputs {
    has_spouse: bool,
    has_child: bool,
    midpoint: Option<f64>,
    baseline: f64,
    has_high_event: bool,
}

impl ScoreInputs {
    fn new(
        profile: &EnrichedProfile,
        income: u64,
        dependents: &[Dependent],
        life_events: &[LifeEvent],
        recommended_coverage_range: &str,
    ) -> Self {
        Self {
            has_spouse: dependents.iter().any(|d| d.kind == DependentType::Spouse),
            has_child: dependents.iter().any(|d| d.kind == DependentType::Child),
            midpoint: parse_coverage_midpoint(recommended_coverage_range).filter(|m| *m > 0.0),
            baseline: income as f64
                * employer_coverage_multiple(profile.effective_company_size()),
            has_high_event: life_events.iter().any(|e| e.confidence == Confidence::High),
        }
    }
}

/// 0-100 estimate of how well the person is likely covered already.
pub fn coverage_confidence_score(
    profile: &EnrichedProfile,
    income: u64,
    dependents: &[Dependent],
    life_events: &[LifeEvent],
    recommended_coverage_range: &str,
) -> u8 {
    let inputs = ScoreInputs::new(
        profile,
        income,
        dependents,
        life_events,
        recommended_coverage_range,
    );
    score_from(&inputs, income, life_events)
}

fn score_from(inputs: &ScoreInputs, income: u64, life_events: &[LifeEvent]) -> u8 {
    let mut score = BASE_SCORE;

    if inputs.has_child {
        score -= CHILD_DEDUCTION;
    }
    if inputs.has_spouse {
        score -= SPOUSE_DEDUCTION;
    }

    if income >= 200_000 {
        score -= 10.0;
    } else if income >= 140_000 {
        score -= 6.0;
    }

    score -= momentum_deduction(life_events);

    if let Some(mid) = inputs.midpoint {
        let gap_ratio = (mid - inputs.baseline).max(0.0) / mid;
        score -= (gap_ratio * GAP_WEIGHT).round();
    }

    score.clamp(0.0, 100.0).round() as u8
}

fn drivers_from(inputs: &ScoreInputs) -> Vec<String> {
    let mut drivers = Vec::new();

    if inputs.has_spouse || inputs.has_child {
        drivers.push(DRIVER_DEPENDENTS.to_string());
    }
    if inputs
        .midpoint
        .is_some_and(|mid| mid > inputs.baseline * 1.25)
    {
        drivers.push(DRIVER_GAP.to_string());
    }
    if inputs.has_high_event {
        drivers.push(DRIVER_MOMENTUM.to_string());
    }
    if drivers.is_empty() {
        drivers.push(DRIVER_DEFAULT.to_string());
    }

    drivers.truncate(MAX_DRIVERS);
    drivers
}

pub fn score_label(score: u8) -> ScoreLabel {
    if score >= 70 {
        ScoreLabel::High
    } else if score >= 45 {
        ScoreLabel::Medium
    } else {
        ScoreLabel::Low
    }
}

fn messaging(score: u8, label: ScoreLabel, life_events: &[LifeEvent], has_high_event: bool) -> Messaging {
    let next_step = if label == ScoreLabel::Low || has_high_event {
        NextStep::Conversation
    } else {
        NextStep::Education
    };

    let score_explanation = match label {
        ScoreLabel::High => format!(
            "A score of {} suggests your current coverage likely keeps pace with your household's needs.",
            score
        ),
        ScoreLabel::Medium => format!(
            "A score of {} suggests partial coverage with some gaps worth reviewing.",
            score
        ),
        ScoreLabel::Low => format!(
            "A score of {} suggests your household may be meaningfully under-protected.",
            score
        ),
    };

    let what_changed = life_events
        .first()
        .map(|e| e.reason.clone())
        .unwrap_or_else(|| "No major recent changes stand out in your profile.".to_string());

    let why_now = if has_high_event {
        "Coverage needs shift fastest right after big career and family changes.".to_string()
    } else if label == ScoreLabel::Low {
        "Closing a coverage gap is simplest while you are healthy and insurable.".to_string()
    } else {
        "Reviewing cover once a year keeps it aligned with income and family.".to_string()
    };

    let next_step_text = match next_step {
        NextStep::Conversation => {
            "Talk through your numbers with an advisor to size the right policy.".to_string()
        }
        NextStep::Education => {
            "Learn how workplace and personal life cover fit together.".to_string()
        }
    };

    Messaging {
        score_label: label,
        score_explanation,
        what_changed,
        why_now,
        next_step,
        next_step_text,
    }
}

/// Scores coverage confidence and assembles drivers and messaging.
pub fn build_coverage_decisioning(
    profile: &EnrichedProfile,
    income: u64,
    dependents: &[Dependent],
    life_events: &[LifeEvent],
    recommended_coverage_range: &str,
) -> CoverageDecisioning {
    let inputs = ScoreInputs::new(
        profile,
        income,
        dependents,
        life_events,
        recommended_coverage_range,
    );
    let score = score_from(&inputs, income, life_events);
    let label = score_label(score);

    CoverageDecisioning {
        life_events: life_events.to_vec(),
        coverage_confidence_score: score,
        drivers: drivers_from(&inputs),
        messaging: messaging(score, label, life_events, inputs.has_high_event),
    }
}
