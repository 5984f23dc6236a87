use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum NotificationKind {
        Announcement => "announcement",
        Fee => "fee",
        Salary => "salary",
        Schedule => "schedule",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub announcement_id: Option<i64>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub announcement_id: Option<i64>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}
