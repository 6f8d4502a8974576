pub mod extract;
pub mod response;
pub mod validation;

pub use extract::{PersonId, ValidatedJson};
pub use validation::{format_violations, Validate, Violation};
