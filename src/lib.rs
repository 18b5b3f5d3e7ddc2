//! Impact Map API Library
//!
//! Turns a work email into a household financial-risk profile: a two-stage
//! contact enrichment against the provider, followed by income, dependents,
//! exposure, life-event and coverage-readiness inference.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Inference pipeline.
//! - `integrations`: Enrichment provider client and payloads.
//! - `classify`: Keyword classification tables.
//! - `config`: Configuration management.
//! - `dependents`: Dependent inference.
//! - `enrichment`: Two-stage enrichment orchestration.
//! - `errors`: Error handling types.
//! - `exposure`: Annual exposure and coverage range.
//! - `handlers`: HTTP request handlers.
//! - `impact`: Impact map assembly and the service interface.
//! - `income`: Income band estimation.
//! - `life_events`: Life event detection.
//! - `merge`: Profile merging.
//! - `mock_enricher`: Offline enricher.
//! - `models`: Core data models.
//! - `provider_models`: Provider response payloads.
//! - `scoring`: Coverage readiness scoring.

pub mod api;
pub mod core;
pub mod integrations;

pub mod classify;
pub mod config;
pub mod dependents;
pub mod enrichment;
pub mod errors;
pub mod exposure;
pub mod handlers;
pub mod impact;
pub mod income;
pub mod life_events;
pub mod merge;
pub mod mock_enricher;
pub mod models;
pub mod provider_models;
pub mod scoring;
