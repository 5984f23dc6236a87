use serde::Serialize;
use ts_rs::TS;

use super::entities::Announcement;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementResponse {
    pub announcement: Announcement,
    pub sms_sent: u64,
}

pub type AnnouncementListResponse = PaginatedResponse<Announcement>;
