use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecordInput {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub records: Vec<AttendanceRecordInput>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummaryQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
