use serde::Deserialize;
use ts_rs::TS;

use super::entities::Audience;
use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub message: String,
    pub audience: Audience,
    /// 限定到某个班级（学生为班级成员，教师为该班任课教师）
    pub class_id: Option<i64>,
    #[serde(default)]
    pub send_sms: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
