use serde::Serialize;
use ts_rs::TS;

use super::entities::Notification;
use crate::models::common::PaginatedResponse;

pub type NotificationListResponse = PaginatedResponse<Notification>;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct MarkedReadResponse {
    pub updated: u64,
}
