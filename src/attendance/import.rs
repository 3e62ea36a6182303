//! Spreadsheet row parsing for bulk attendance import.
//!
//! Rows arrive as cells that are either text or numbers. Numeric dates and
//! times are Excel serials (days since 1899-12-30, with the fractional part
//! giving the time of day) and are converted before anything is stored.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::AttendanceStatus;

/// File extensions accepted for attendance import.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Largest whole number a numeric cell holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A numeric cell, including Excel date/time serials.
    Number(f64),
    /// A text cell.
    Text(String),
}

impl CellValue {
    /// Returns the cell as trimmed text, or `None` if it is blank.
    ///
    /// Whole numbers are rendered without a fractional part, so an employee
    /// id typed as `1001` reads back as `"1001"`.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Number(n) if self.is_exact() && n.fract() == 0.0 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// False for numeric cells whose value could not have been stored
    /// exactly: non-finite values and whole numbers beyond 2^53.
    pub fn is_exact(&self) -> bool {
        match self {
            CellValue::Number(n) => {
                n.is_finite() && (n.fract() != 0.0 || n.abs() <= MAX_EXACT_INTEGER)
            }
            CellValue::Text(_) => true,
        }
    }
}

/// One data row of an attendance sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Employee identifier (required).
    pub employee_id: Option<CellValue>,
    /// Employee name (required).
    pub name: Option<CellValue>,
    /// Attendance status (required).
    pub status: Option<CellValue>,
    /// Attendance date (required).
    pub date: Option<CellValue>,
    /// Check-in time.
    #[serde(default)]
    pub in_time: Option<CellValue>,
    /// Check-out time.
    #[serde(default)]
    pub out_time: Option<CellValue>,
}

/// A row that passed parsing and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEntry {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee name.
    pub employee_name: String,
    /// Attendance status.
    pub status: AttendanceStatus,
    /// Attendance date.
    pub date: NaiveDate,
    /// Check-in time, if given.
    pub in_time: Option<NaiveTime>,
    /// Check-out time, if given.
    pub out_time: Option<NaiveTime>,
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Spreadsheet row number (the header is row 1).
    pub row: usize,
    /// Why the row was rejected.
    pub message: String,
}

/// Returns the spreadsheet row number of the data row at `index`.
pub fn spreadsheet_row(index: usize) -> usize {
    index + 2
}

/// Checks that an uploaded file name has a supported spreadsheet extension.
///
/// # Examples
///
/// ```
/// use hrms_engine::attendance::check_file_type;
///
/// assert!(check_file_type("march.XLSX").is_ok());
/// assert!(check_file_type("march.pdf").is_err());
/// ```
pub fn check_file_type(file_name: &str) -> EngineResult<()> {
    let supported = file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(EngineError::UnsupportedFileType {
            file_name: file_name.to_string(),
        })
    }
}

/// Converts an Excel serial to a date, ignoring any time-of-day fraction.
///
/// # Examples
///
/// ```
/// use hrms_engine::attendance::excel_serial_to_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(excel_serial_to_date(45292.0), NaiveDate::from_ymd_opt(2024, 1, 1));
/// ```
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Converts the fractional part of an Excel serial to a time of day,
/// rounded to the nearest minute.
///
/// # Examples
///
/// ```
/// use hrms_engine::attendance::excel_serial_to_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(excel_serial_to_time(0.375), NaiveTime::from_hms_opt(9, 0, 0));
/// ```
pub fn excel_serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let fraction = serial - serial.floor();
    let minutes = (fraction * MINUTES_PER_DAY).round() as u32 % 1440;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Number(serial) => excel_serial_to_date(*serial),
        CellValue::Text(text) => {
            let text = text.trim();
            if let Ok(serial) = text.parse::<f64>() {
                return excel_serial_to_date(serial);
            }
            ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        }
    }
}

fn parse_time(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::Number(serial) => excel_serial_to_time(*serial),
        CellValue::Text(text) => {
            let text = text.trim();
            if let Ok(serial) = text.parse::<f64>() {
                return excel_serial_to_time(serial);
            }
            parse_clock_time(text)
        }
    }
}

/// Parses an `HH:MM` or `HH:MM:SS` clock time.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text.trim(), format).ok())
}

fn required_text(cell: &Option<CellValue>, column: &str) -> Result<String, String> {
    let text = cell
        .as_ref()
        .and_then(CellValue::as_text)
        .ok_or_else(|| format!("missing required column '{}'", column))?;
    if cell.as_ref().is_some_and(|cell| !cell.is_exact()) {
        return Err(format!("invalid {} '{}'", column, text));
    }
    Ok(text)
}

fn optional_time(cell: &Option<CellValue>, column: &str) -> Result<Option<NaiveTime>, String> {
    match cell {
        None => Ok(None),
        Some(cell) if cell.as_text().is_none() => Ok(None),
        Some(cell) => parse_time(cell)
            .map(Some)
            .ok_or_else(|| format!("invalid {} '{}'", column, cell.as_text().unwrap_or_default())),
    }
}

/// Parses one sheet row into an [`AttendanceEntry`].
///
/// The error is a human-readable reason suitable for a [`RowError`].
pub fn parse_row(row: &ImportRow) -> Result<AttendanceEntry, String> {
    let employee_id = required_text(&row.employee_id, "employee_id")?;
    let employee_name = required_text(&row.name, "name")?;
    let status_text = required_text(&row.status, "status")?;
    required_text(&row.date, "date")?;

    let status = AttendanceStatus::parse(&status_text)
        .ok_or_else(|| format!("unknown status '{}'", status_text))?;

    let date = row
        .date
        .as_ref()
        .and_then(parse_date)
        .ok_or_else(|| {
            format!(
                "invalid date '{}'",
                row.date.as_ref().and_then(CellValue::as_text).unwrap_or_default()
            )
        })?;

    let in_time = optional_time(&row.in_time, "in_time")?;
    let out_time = optional_time(&row.out_time, "out_time")?;

    Ok(AttendanceEntry {
        employee_id,
        employee_name,
        status,
        date,
        in_time,
        out_time,
    })
}
