use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}
