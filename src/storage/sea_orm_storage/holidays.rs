//! 节假日存储操作

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::SeaOrmStorage;
use crate::entity::holidays;
use crate::entity::prelude::Holidays;
use crate::errors::{Result, TutorHubError};
use crate::models::holidays::{
    entities::Holiday,
    requests::{CreateHolidayRequest, UpdateHolidayRequest},
};

impl SeaOrmStorage {
    /// 日期唯一，重复时由唯一索引返回 Conflict
    pub async fn create_holiday_impl(&self, holiday: CreateHolidayRequest) -> Result<Holiday> {
        let model = holidays::ActiveModel {
            holiday_date: Set(holiday.holiday_date),
            title: Set(holiday.title),
            description: Set(holiday.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;
        Ok(result.into_holiday())
    }

    pub async fn get_holiday_by_id_impl(&self, holiday_id: i64) -> Result<Option<Holiday>> {
        Ok(Holidays::find_by_id(holiday_id)
            .one(&self.db)
            .await?
            .map(|m| m.into_holiday()))
    }

    pub async fn get_holiday_by_date_impl(&self, date: NaiveDate) -> Result<Option<Holiday>> {
        Ok(Holidays::find()
            .filter(holidays::Column::HolidayDate.eq(date))
            .one(&self.db)
            .await?
            .map(|m| m.into_holiday()))
    }

    /// 按日期升序列出，可限定年份
    pub async fn list_holidays_impl(&self, year: Option<i32>) -> Result<Vec<Holiday>> {
        let mut select = Holidays::find();
        if let Some(year) = year {
            let first = NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| TutorHubError::validation(format!("Invalid year {year}")))?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| TutorHubError::validation(format!("Invalid year {year}")))?;
            select = select.filter(holidays::Column::HolidayDate.between(first, last));
        }

        let rows = select
            .order_by_asc(holidays::Column::HolidayDate)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.into_holiday()).collect())
    }

    pub async fn update_holiday_impl(
        &self,
        holiday_id: i64,
        update: UpdateHolidayRequest,
    ) -> Result<Option<Holiday>> {
        let Some(existing) = Holidays::find_by_id(holiday_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: holidays::ActiveModel = existing.into();
        if let Some(date) = update.holiday_date {
            model.holiday_date = Set(date);
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let updated = model.update(&self.db).await?;
        Ok(Some(updated.into_holiday()))
    }

    pub async fn delete_holiday_impl(&self, holiday_id: i64) -> Result<bool> {
        let result = Holidays::delete_by_id(holiday_id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
