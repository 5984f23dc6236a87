use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
        Excused => "excused",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct Attendance {
    pub id: i64,
    pub schedule_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub marked_by: Option<i64>,
    pub marked_at: chrono::DateTime<chrono::Utc>,
}

// 考勤汇总，只统计已完成的课程
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub excused: u64,
    /// (present + late) / total，百分比保留两位小数
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    pub fn from_statuses(
        student_id: i64,
        statuses: impl IntoIterator<Item = AttendanceStatus>,
    ) -> Self {
        let mut summary = Self {
            student_id,
            ..Default::default()
        };
        for status in statuses {
            summary.total += 1;
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }
        if summary.total > 0 {
            let rate = (summary.present + summary.late) as f64 / summary.total as f64 * 100.0;
            summary.attendance_rate = (rate * 100.0).round() / 100.0;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_rate() {
        use AttendanceStatus::*;
        let s = AttendanceSummary::from_statuses(9, [Present, Late, Absent]);
        assert_eq!(s.total, 3);
        assert_eq!(s.present, 1);
        assert_eq!(s.late, 1);
        assert_eq!(s.absent, 1);
        assert_eq!(s.attendance_rate, 66.67);
    }

    #[test]
    fn test_empty_summary() {
        let s = AttendanceSummary::from_statuses(9, []);
        assert_eq!(s.total, 0);
        assert_eq!(s.attendance_rate, 0.0);
    }
}
