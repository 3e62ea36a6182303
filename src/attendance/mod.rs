//! Attendance tracking.
//!
//! Check-in/check-out punches with GPS locations, and bulk import of
//! spreadsheet rows. All records live in a single [`AttendanceStore`].

mod import;
mod store;

pub use import::{
    AttendanceEntry, CellValue, ImportRow, RowError, SUPPORTED_EXTENSIONS, check_file_type,
    excel_serial_to_date, excel_serial_to_time, parse_clock_time, parse_row, spreadsheet_row,
};
pub use store::{AttendanceStore, ImportSummary, Punch};
