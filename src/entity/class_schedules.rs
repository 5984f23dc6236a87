//! 课程安排实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::schedules::entities::{Schedule, ScheduleStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub tutor_id: i64,
    pub schedule_date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub room: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule(self) -> Schedule {
        Schedule {
            id: self.id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            tutor_id: self.tutor_id,
            schedule_date: self.schedule_date,
            start_time: self.start_time,
            end_time: self.end_time,
            room: self.room,
            notes: self.notes,
            status: parse_or(
                &self.status,
                ScheduleStatus::Upcoming,
                "class_schedules.status",
            ),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
