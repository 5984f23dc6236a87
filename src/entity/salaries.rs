//! 工资实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::fees::entities::PaymentStatus;
use crate::models::salaries::entities::Salary;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "salaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tutor_id: i64,
    pub month: String,
    pub base_amount: f64,
    pub sessions_count: i32,
    pub session_amount: f64,
    pub total_amount: f64,
    pub status: String,
    pub paid_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TutorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Tutor,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_salary(self) -> Salary {
        Salary {
            id: self.id,
            tutor_id: self.tutor_id,
            month: self.month,
            base_amount: self.base_amount,
            sessions_count: self.sessions_count,
            session_amount: self.session_amount,
            total_amount: self.total_amount,
            status: parse_or(&self.status, PaymentStatus::Pending, "salaries.status"),
            paid_at: self.paid_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
