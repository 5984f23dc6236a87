//! 通知实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::notifications::entities::{Notification, NotificationKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub announcement_id: Option<i64>,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::announcements::Entity",
        from = "Column::AnnouncementId",
        to = "super::announcements::Column::Id",
        on_delete = "Cascade"
    )]
    Announcement,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::announcements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Announcement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> Notification {
        Notification {
            id: self.id,
            user_id: self.user_id,
            announcement_id: self.announcement_id,
            kind: parse_or(
                &self.kind,
                NotificationKind::Announcement,
                "notifications.kind",
            ),
            title: self.title,
            message: self.message,
            is_read: self.is_read,
            created_at: to_datetime(self.created_at),
        }
    }
}
