/// Property-based tests using proptest
/// Tests invariants that should hold for all profiles and inference inputs
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_impact_api::dependents::infer_dependents;
use rust_impact_api::enrichment::is_valid_email;
use rust_impact_api::impact::infer_impact_map_at;
use rust_impact_api::income::income_band_index;
use rust_impact_api::merge::{merge_profiles, union_case_insensitive};
use rust_impact_api::models::{CompanySize, EnrichedProfile, Field};

const ROLES: &[&str] = &[
    "Software Engineer",
    "Senior Software Engineer",
    "Engineering Manager",
    "Director of Sales",
    "CEO",
    "Co-Founder",
    "Owner",
    "Freelance Designer",
    "Teacher",
    "VP Finance",
    "Professional",
    "",
];

const INDUSTRIES: &[&str] = &[
    "Software",
    "Retail",
    "Higher Education",
    "Banking",
    "Construction",
    "Nonprofit Organization Management",
    "",
];

const LOCATIONS: &[&str] = &["Austin, TX", "Chicago", "San Francisco, CA", "London", "Lisbon", ""];

const SIZES: &[CompanySize] = &[
    CompanySize::Startup,
    CompanySize::Small,
    CompanySize::Medium,
    CompanySize::Large,
    CompanySize::Enterprise,
];

const AGE_RANGES: &[&str] = &["18-24", "25-34", "30-39", "35-44", "40-49", "45-54", "55-64", "65+"];

const MARITAL: &[&str] = &["single", "married", "divorced", "widowed"];

fn text_field() -> impl Strategy<Value = Field<String>> {
    prop_oneof![
        Just(Field::Unset),
        "[A-Za-z][A-Za-z ]{0,15}".prop_map(Field::text),
    ]
}

fn contact_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z]{1,6}@[a-z]{1,5}\\.com", 0..4)
        .prop_map(|raw| union_case_insensitive(&raw, &[]))
}

prop_compose! {
    fn arb_profile()(
        name in text_field(),
        company in text_field(),
        role in prop::sample::select(ROLES),
        industry in prop::sample::select(INDUSTRIES),
        location in prop::sample::select(LOCATIONS),
        size in prop::option::of(prop::sample::select(SIZES)),
        headline in text_field(),
        work_emails in contact_list(),
        phones in contact_list(),
    ) -> EnrichedProfile {
        let mut p = EnrichedProfile::new("subject@example.com");
        p.name = name;
        p.company = company;
        p.role = Field::text(role);
        p.industry = Field::text(industry);
        p.location = Field::text(location);
        p.company_size = size.into();
        p.headline = headline;
        p.work_emails = work_emails;
        p.phones = phones;
        p
    }
}

// Property: Email validation should never panic
proptest! {
    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }
}

// Property: merging an empty overlay only refreshes the timestamp
proptest! {
    #[test]
    fn merge_with_empty_overlay_is_identity(profile in arb_profile()) {
        let mut merged = merge_profiles(profile.clone(), EnrichedProfile::new(""));
        prop_assert!(merged.enriched_at >= profile.enriched_at);
        merged.enriched_at = profile.enriched_at;
        prop_assert_eq!(merged, profile);
    }

    #[test]
    fn unset_base_takes_overlay_and_known_base_wins(
        base in prop_oneof![
            Just("unknown".to_string()),
            Just("Unknown Company".to_string()),
            Just("PROFESSIONAL".to_string()),
            Just("general".to_string()),
            Just("  ".to_string()),
            "[A-Za-z]{1,12}",
        ],
        overlay in "[A-Za-z]{0,12}",
    ) {
        let mut b = EnrichedProfile::new("a@b.com");
        b.company = Field::text(&base);
        let mut o = EnrichedProfile::new("a@b.com");
        o.company = Field::text(&overlay);

        let merged = merge_profiles(b.clone(), o.clone());
        if b.company.is_known() {
            prop_assert_eq!(merged.company, b.company);
        } else {
            prop_assert_eq!(merged.company, o.company);
        }
    }

    #[test]
    fn contact_lists_are_case_insensitive_unions(
        base in prop::collection::vec("[a-cA-C]{1,3}", 0..6),
        overlay in prop::collection::vec("[a-cA-C ]{0,3}", 0..6),
    ) {
        let mut b = EnrichedProfile::new("a@b.com");
        b.work_emails = base.clone();
        let mut o = EnrichedProfile::new("a@b.com");
        o.work_emails = overlay.clone();

        let merged = merge_profiles(b, o).work_emails;

        // base-first ordering
        let base_only = union_case_insensitive(&base, &[]);
        prop_assert_eq!(&merged[..base_only.len()], &base_only[..]);

        // no duplicates, nothing blank
        let mut keys: Vec<String> = merged.iter().map(|v| v.trim().to_lowercase()).collect();
        prop_assert!(keys.iter().all(|k| !k.is_empty()));
        let before = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);

        // every non-blank input survives
        for value in base.iter().chain(overlay.iter()).filter(|v| !v.trim().is_empty()) {
            let key = value.trim().to_lowercase();
            prop_assert!(merged.iter().any(|m| m.trim().to_lowercase() == key));
        }
    }
}

// Property: high-pay and high-cost signals never lower the band
proptest! {
    #[test]
    fn income_band_is_monotonic_in_pay_signals(
        role in prop::sample::select(ROLES),
        size in prop::sample::select(SIZES),
        industry in prop::sample::select(INDUSTRIES),
        location in prop::sample::select(LOCATIONS),
    ) {
        let base = income_band_index(role, size, Some(industry), Some(location));

        let richer_industry = format!("{} software", industry);
        prop_assert!(income_band_index(role, size, Some(richer_industry.as_str()), Some(location)) >= base);

        let pricier_location = format!("{} / San Francisco", location);
        prop_assert!(income_band_index(role, size, Some(industry), Some(pricier_location.as_str())) >= base);
    }

    #[test]
    fn dependents_are_never_empty(
        role in prop::sample::select(ROLES),
        size in prop::sample::select(SIZES),
        age in prop::option::of(prop::sample::select(AGE_RANGES)),
        marital in prop::option::of(prop::sample::select(MARITAL)),
    ) {
        prop_assert!(!infer_dependents(role, size, age, marital).is_empty());
    }
}

// Property: the assembled map respects score bounds and life-event ordering
proptest! {
    #[test]
    fn impact_map_score_and_events_are_bounded(
        profile in arb_profile(),
        start_year in prop::option::of(2015i32..=2026),
        age in prop::option::of(prop::sample::select(AGE_RANGES)),
        marital in prop::option::of(prop::sample::select(MARITAL)),
    ) {
        let mut profile = profile;
        profile.position_start = start_year
            .map(|year| rust_impact_api::models::PositionStart { month: Some(6), year })
            .into();
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();

        let map = infer_impact_map_at(profile, age, marital, now);

        prop_assert!(map.decisioning.coverage_confidence_score <= 100);
        prop_assert!(map.decisioning.drivers.len() <= 3);
        prop_assert!(!map.decisioning.drivers.is_empty());
        prop_assert!(!map.dependents.is_empty());

        let events = &map.decisioning.life_events;
        prop_assert!(events.len() <= 5);
        for pair in events.windows(2) {
            prop_assert!(pair[0].confidence.rank() >= pair[1].confidence.rank());
        }
    }
}
