//! Payroll, tax regime and attendance engine for an HRMS backend
//!
//! This crate decomposes an annual CTC into salary components, evaluates
//! income tax under the old and new Indian regimes, recommends the cheaper
//! one, and tracks employee attendance through check-in/check-out punches
//! and spreadsheet imports.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod profiles;
