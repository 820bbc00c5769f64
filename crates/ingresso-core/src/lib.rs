pub mod domain;
pub mod error;
pub mod payload;
pub mod rules;

pub use domain::*;
pub use error::CoreError;
pub use payload::NormalizedPayload;
pub use rules::*;
