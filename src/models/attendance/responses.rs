use serde::Serialize;
use ts_rs::TS;

use super::entities::Attendance;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListResponse {
    pub schedule_id: i64,
    pub items: Vec<Attendance>,
}
