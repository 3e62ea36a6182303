//! In-memory attendance store.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::calculate_worked_time;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, GeoPoint};

use super::import::{AttendanceEntry, ImportRow, RowError, parse_row, spreadsheet_row};

/// A check-in or check-out punch.
#[derive(Debug, Clone, PartialEq)]
pub struct Punch {
    /// The employee punching in or out.
    pub employee_id: String,
    /// Attendance date.
    pub date: NaiveDate,
    /// Clock time of the punch.
    pub time: NaiveTime,
    /// Where the punch was made.
    pub location: GeoPoint,
}

impl Punch {
    fn validate(&self) -> EngineResult<()> {
        if self.employee_id.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "employee_id".to_string(),
            });
        }
        if !self.location.is_valid() {
            return Err(EngineError::validation(
                "location",
                format!(
                    "latitude {} / longitude {} out of range",
                    self.location.latitude, self.location.longitude
                ),
            ));
        }
        Ok(())
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Records created.
    pub created: usize,
    /// Existing records updated.
    pub updated: usize,
    /// Rows that were rejected.
    pub errors: Vec<RowError>,
}

/// Attendance records, guarded by a single lock.
///
/// Every operation that reads and then writes holds the lock across both, so
/// two concurrent check-ins for the same employee and date cannot both
/// succeed, and an import is never observed half applied.
#[derive(Debug, Default)]
pub struct AttendanceStore {
    records: Mutex<Vec<AttendanceRecord>>,
}

impl AttendanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a `present` record for the employee on the punch date.
    ///
    /// Fails with [`EngineError::AlreadyCheckedIn`] if the employee already
    /// has an open record for that date.
    pub async fn check_in(&self, punch: Punch) -> EngineResult<AttendanceRecord> {
        punch.validate()?;

        let mut records = self.records.lock().await;
        if records
            .iter()
            .any(|r| r.employee_id == punch.employee_id && r.date == punch.date && r.is_open())
        {
            return Err(EngineError::AlreadyCheckedIn {
                employee_id: punch.employee_id,
                date: punch.date,
            });
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: punch.employee_id,
            employee_name: None,
            date: punch.date,
            status: AttendanceStatus::Present,
            in_time: Some(punch.time),
            out_time: None,
            check_in_location: Some(punch.location),
            check_out_location: None,
            worked_minutes: None,
            total_hours: None,
        };
        debug!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            date = %record.date,
            "Checked in"
        );
        records.push(record.clone());
        Ok(record)
    }

    /// Closes the employee's open record for the punch date and records the
    /// worked time.
    ///
    /// When nothing is open on the punch date, a record left open on the
    /// previous day is closed instead if the punch time is earlier than its
    /// check-in time, so a night shift can be closed on the morning after.
    ///
    /// Fails with [`EngineError::NoOpenCheckIn`] if there is nothing to close.
    pub async fn check_out(&self, punch: Punch) -> EngineResult<AttendanceRecord> {
        punch.validate()?;

        let mut records = self.records.lock().await;
        let position = records
            .iter()
            .position(|r| r.employee_id == punch.employee_id && r.date == punch.date && r.is_open())
            .or_else(|| {
                let previous_day = punch.date.pred_opt()?;
                records.iter().position(|r| {
                    r.employee_id == punch.employee_id
                        && r.date == previous_day
                        && r.is_open()
                        && r.in_time.is_some_and(|in_time| punch.time < in_time)
                })
            })
            .ok_or_else(|| EngineError::NoOpenCheckIn {
                employee_id: punch.employee_id.clone(),
                date: punch.date,
            })?;
        let record = &mut records[position];

        record.out_time = Some(punch.time);
        record.check_out_location = Some(punch.location);
        apply_worked_time(record);

        debug!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            worked_minutes = ?record.worked_minutes,
            "Checked out"
        );
        Ok(record.clone())
    }

    /// Returns the employee's records, optionally for a single date, ordered
    /// by date then check-in time.
    pub async fn list(&self, employee_id: &str, date: Option<NaiveDate>) -> Vec<AttendanceRecord> {
        let records = self.records.lock().await;
        let mut matching: Vec<AttendanceRecord> = records
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .filter(|r| date.is_none_or(|d| r.date == d))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.date, a.in_time).cmp(&(b.date, b.in_time)));
        matching
    }

    /// Upserts a batch of spreadsheet rows.
    ///
    /// Rows are parsed first; invalid ones are reported with their
    /// spreadsheet row number and skipped. Valid rows are then applied in
    /// order under one lock.
    pub async fn import(&self, rows: &[ImportRow]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match parse_row(row) {
                Ok(entry) => entries.push(entry),
                Err(message) => summary.errors.push(RowError {
                    row: spreadsheet_row(index),
                    message,
                }),
            }
        }

        let mut records = self.records.lock().await;
        for entry in entries {
            if upsert(&mut records, entry) {
                summary.created += 1;
            } else {
                summary.updated += 1;
            }
        }

        debug!(
            created = summary.created,
            updated = summary.updated,
            rejected = summary.errors.len(),
            "Applied attendance import"
        );
        summary
    }
}

/// Returns true if a new record was created.
fn upsert(records: &mut Vec<AttendanceRecord>, entry: AttendanceEntry) -> bool {
    if let Some(record) = records
        .iter_mut()
        .find(|r| r.employee_id == entry.employee_id && r.date == entry.date)
    {
        record.status = entry.status;
        record.employee_name = Some(entry.employee_name);
        if entry.in_time.is_some() {
            record.in_time = entry.in_time;
        }
        if entry.out_time.is_some() {
            record.out_time = entry.out_time;
        }
        apply_worked_time(record);
        return false;
    }

    let mut record = AttendanceRecord {
        id: Uuid::new_v4(),
        employee_id: entry.employee_id,
        employee_name: Some(entry.employee_name),
        date: entry.date,
        status: entry.status,
        in_time: entry.in_time,
        out_time: entry.out_time,
        check_in_location: None,
        check_out_location: None,
        worked_minutes: None,
        total_hours: None,
    };
    apply_worked_time(&mut record);
    records.push(record);
    true
}

fn apply_worked_time(record: &mut AttendanceRecord) {
    if let (Some(in_time), Some(out_time)) = (record.in_time, record.out_time) {
        let worked = calculate_worked_time(in_time, out_time);
        record.worked_minutes = Some(worked.minutes);
        record.total_hours = Some(worked.hours);
    }
}
