use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::ScheduleStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateScheduleRequest {
    pub class_id: i64,
    pub subject_id: i64,
    /// 缺省为科目的任课教师
    pub tutor_id: Option<i64>,
    pub schedule_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateScheduleRequest {
    pub subject_id: Option<i64>,
    pub tutor_id: Option<i64>,
    pub schedule_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub room: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateScheduleStatusRequest {
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub tutor_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<ScheduleStatus>,
    /// 学生视角：仅其所在班级
    #[serde(skip)]
    #[ts(skip)]
    pub student_id: Option<i64>,
}
