//! 学费实体

use sea_orm::entity::prelude::*;

use super::{parse_or, to_datetime};
use crate::models::fees::entities::{Fee, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub month: String,
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    pub status: String,
    pub paid_at: Option<i64>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee(self) -> Fee {
        Fee {
            id: self.id,
            student_id: self.student_id,
            month: self.month,
            amount: self.amount,
            due_date: self.due_date,
            status: parse_or(&self.status, PaymentStatus::Pending, "fees.status"),
            paid_at: self.paid_at.map(to_datetime),
            payment_method: self.payment_method,
            notes: self.notes,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
