//! In-memory payroll profile store.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollProfile;

use super::ProfileValidator;

/// The outcome of writing a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileWrite {
    /// The profile as stored.
    pub profile: PayrollProfile,
    /// True if no profile existed for the employee before.
    pub created: bool,
}

/// Payroll profiles keyed by employee id.
#[derive(Debug)]
pub struct PayrollStore {
    profiles: RwLock<HashMap<String, PayrollProfile>>,
    validator: ProfileValidator,
}

impl PayrollStore {
    /// Creates an empty store.
    pub fn new() -> EngineResult<Self> {
        Ok(Self {
            profiles: RwLock::new(HashMap::new()),
            validator: ProfileValidator::new()?,
        })
    }

    /// Validates and stores a profile, replacing any existing one for the
    /// same employee. `updated_at` is set to the current time.
    pub async fn upsert(&self, mut profile: PayrollProfile) -> EngineResult<ProfileWrite> {
        self.validator.validate(&profile)?;
        profile.updated_at = Utc::now();

        let mut profiles = self.profiles.write().await;
        let created = profiles
            .insert(profile.employee_id.clone(), profile.clone())
            .is_none();

        debug!(employee_id = %profile.employee_id, created, "Stored payroll profile");
        Ok(ProfileWrite { profile, created })
    }

    /// Returns the profile for an employee.
    pub async fn get(&self, employee_id: &str) -> EngineResult<PayrollProfile> {
        self.profiles
            .read()
            .await
            .get(employee_id)
            .cloned()
            .ok_or_else(|| EngineError::ProfileNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Returns every profile, ordered by employee id.
    pub async fn list(&self) -> Vec<PayrollProfile> {
        let mut profiles: Vec<PayrollProfile> =
            self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        profiles
    }
}
