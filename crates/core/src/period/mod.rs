//! Date windows and organization-local calendar days.

pub mod error;
pub mod window;

pub use error::PeriodError;
pub use window::{DateWindow, local_date};
