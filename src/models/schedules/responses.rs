use serde::Serialize;
use ts_rs::TS;

use super::entities::Schedule;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleResponse {
    pub schedule: Schedule,
}

pub type ScheduleListResponse = PaginatedResponse<Schedule>;
