//! 公告实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::announcements::entities::{Announcement, Audience};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub message: String,
    pub audience: String,
    pub class_id: Option<i64>,
    pub created_by: Option<i64>,
    pub send_sms: bool,
    pub recipients: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> Announcement {
        Announcement {
            id: self.id,
            title: self.title,
            message: self.message,
            audience: parse_or(&self.audience, Audience::All, "announcements.audience"),
            class_id: self.class_id,
            created_by: self.created_by,
            send_sms: self.send_sms,
            recipients: self.recipients,
            created_at: to_datetime(self.created_at),
        }
    }
}
