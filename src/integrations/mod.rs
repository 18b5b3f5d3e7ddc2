//! External service integrations.

pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod provider_models {
    pub use crate::provider_models::*;
}

pub mod mock_enricher {
    pub use crate::mock_enricher::*;
}
