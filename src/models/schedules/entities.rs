use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    // 课程状态：upcoming -> completed | cancelled
    #[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
    pub enum ScheduleStatus {
        Upcoming => "upcoming",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl ScheduleStatus {
    /// 仅允许从 upcoming 转出
    pub fn can_transition_to(&self, next: ScheduleStatus) -> bool {
        matches!(
            (self, next),
            (ScheduleStatus::Upcoming, ScheduleStatus::Completed)
                | (ScheduleStatus::Upcoming, ScheduleStatus::Cancelled)
        )
    }

    /// 已取消的课程不占用教师时间
    pub fn blocks_time(&self) -> bool {
        *self != ScheduleStatus::Cancelled
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct Schedule {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub tutor_id: i64,
    pub schedule_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub notes: Option<String>,
    pub status: ScheduleStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Schedule {
    /// 半开区间重叠：existing.start < new.end 且 existing.end > new.start
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        crate::utils::dates::time_ranges_overlap(self.start_time, self.end_time, start, end)
    }
}

/// 存储层写入参数（已校验）
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub class_id: i64,
    pub subject_id: i64,
    pub tutor_id: i64,
    pub schedule_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ScheduleStatus::*;
        assert!(Upcoming.can_transition_to(Completed));
        assert!(Upcoming.can_transition_to(Cancelled));
        assert!(!Upcoming.can_transition_to(Upcoming));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Cancelled.blocks_time());
    }
}
