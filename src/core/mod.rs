// Domain-layer modules and shared errors/models
pub mod inference {
    pub use crate::dependents::*;
    pub use crate::exposure::*;
    pub use crate::income::*;
    pub use crate::life_events::*;
    pub use crate::scoring::*;
}

pub mod impact {
    pub use crate::impact::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
