//! 节假日实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::holidays::entities::Holiday;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "holidays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub holiday_date: chrono::NaiveDate,
    pub title: String,
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_holiday(self) -> Holiday {
        Holiday {
            id: self.id,
            holiday_date: self.holiday_date,
            title: self.title,
            description: self.description,
            created_at: to_datetime(self.created_at),
        }
    }
}
