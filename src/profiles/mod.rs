//! Stored payroll profiles and their validation.

mod store;
mod validation;

pub use store::{PayrollStore, ProfileWrite};
pub use validation::ProfileValidator;
