//! Application state for the HRMS engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::attendance::AttendanceStore;
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::profiles::PayrollStore;

/// Shared application state.
///
/// Holds the loaded payroll rules and the in-memory stores. Cloning is
/// cheap; every clone points at the same stores.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    attendance: Arc<AttendanceStore>,
    payroll: Arc<PayrollStore>,
}

impl AppState {
    /// Creates application state with empty stores.
    pub fn new(config: ConfigLoader) -> EngineResult<Self> {
        Ok(Self {
            config: Arc::new(config),
            attendance: Arc::new(AttendanceStore::new()),
            payroll: Arc::new(PayrollStore::new()?),
        })
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the attendance store.
    pub fn attendance(&self) -> &AttendanceStore {
        &self.attendance
    }

    /// Returns the payroll profile store.
    pub fn payroll(&self) -> &PayrollStore {
        &self.payroll
    }
}
