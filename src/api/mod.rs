//! HTTP API module for the HRMS engine.
//!
//! This module provides the REST endpoints for payroll calculation, regime
//! comparison, stored payroll profiles and attendance.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceQuery, ImportRequest, PayrollProfileRequest, PunchRequest, TaxCompareRequest,
};
pub use response::{ApiError, ApiErrorResponse, HealthResponse, ProfileCalculationResponse};
pub use state::AppState;
