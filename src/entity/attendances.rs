//! 考勤实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::attendance::entities::{Attendance, AttendanceStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub schedule_id: i64,
    pub student_id: i64,
    pub status: String,
    pub remarks: Option<String>,
    pub marked_by: Option<i64>,
    pub marked_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_schedules::Entity",
        from = "Column::ScheduleId",
        to = "super::class_schedules::Column::Id",
        on_delete = "Cascade"
    )]
    Schedule,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::class_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance(self) -> Attendance {
        Attendance {
            id: self.id,
            schedule_id: self.schedule_id,
            student_id: self.student_id,
            status: parse_or(&self.status, AttendanceStatus::Absent, "attendances.status"),
            remarks: self.remarks,
            marked_by: self.marked_by,
            marked_at: to_datetime(self.marked_at),
        }
    }
}
