//! Attendance models.
//!
//! This module defines the [`AttendanceRecord`] kept for each check-in or
//! imported spreadsheet row, and the status values it can carry.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The attendance status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Present for the day.
    Present,
    /// Absent without leave.
    Absent,
    /// Present for half the day.
    HalfDay,
    /// On approved leave.
    OnLeave,
}

impl AttendanceStatus {
    /// Parses a free-text status as typed into a spreadsheet.
    ///
    /// Matching ignores case, surrounding whitespace, and whether words are
    /// separated by a space, an underscore, a hyphen or nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrms_engine::models::AttendanceStatus;
    ///
    /// assert_eq!(AttendanceStatus::parse("Half Day"), Some(AttendanceStatus::HalfDay));
    /// assert_eq!(AttendanceStatus::parse("leave"), Some(AttendanceStatus::OnLeave));
    /// assert_eq!(AttendanceStatus::parse("sick"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            "halfday" => Some(AttendanceStatus::HalfDay),
            "leave" | "onleave" => Some(AttendanceStatus::OnLeave),
            _ => None,
        }
    }
}

/// A GPS position captured at check-in or check-out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns true if both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One attendance entry for an employee on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// Display name, when known.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// The attendance date.
    pub date: NaiveDate,
    /// The attendance status.
    pub status: AttendanceStatus,
    /// Check-in time.
    pub in_time: Option<NaiveTime>,
    /// Check-out time.
    pub out_time: Option<NaiveTime>,
    /// Where the employee checked in.
    #[serde(default)]
    pub check_in_location: Option<GeoPoint>,
    /// Where the employee checked out.
    #[serde(default)]
    pub check_out_location: Option<GeoPoint>,
    /// Minutes between check-in and check-out.
    pub worked_minutes: Option<i64>,
    /// Worked time in hours, rounded to two decimal places.
    pub total_hours: Option<Decimal>,
}

impl AttendanceRecord {
    /// Returns true if the employee has checked in but not yet out.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrms_engine::models::{AttendanceRecord, AttendanceStatus};
    /// use chrono::{NaiveDate, NaiveTime};
    /// use uuid::Uuid;
    ///
    /// let record = AttendanceRecord {
    ///     id: Uuid::new_v4(),
    ///     employee_id: "EMP001".to_string(),
    ///     employee_name: None,
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    ///     status: AttendanceStatus::Present,
    ///     in_time: NaiveTime::from_hms_opt(9, 0, 0),
    ///     out_time: None,
    ///     check_in_location: None,
    ///     check_out_location: None,
    ///     worked_minutes: None,
    ///     total_hours: None,
    /// };
    /// assert!(record.is_open());
    /// ```
    pub fn is_open(&self) -> bool {
        self.in_time.is_some() && self.out_time.is_none()
    }
}
