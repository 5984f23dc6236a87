//! 首页统计

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use super::SeaOrmStorage;
use crate::entity::prelude::{ClassSchedules, Classes, Fees, Users};
use crate::entity::{class_schedules, fees, users};
use crate::errors::Result;
use crate::models::{
    dashboard::responses::DashboardSummary,
    fees::entities::PaymentStatus,
    salaries::entities::round_cents,
    schedules::entities::ScheduleStatus,
    users::entities::UserRole,
};
use crate::utils::dates::month_timestamp_range;

impl SeaOrmStorage {
    /// 币种由调用方填充
    pub async fn dashboard_summary_impl(
        &self,
        today: NaiveDate,
        month: &str,
    ) -> Result<DashboardSummary> {
        let students = Users::find()
            .filter(users::Column::Role.eq(UserRole::Student.as_str()))
            .count(&self.db)
            .await?;
        let tutors = Users::find()
            .filter(users::Column::Role.eq(UserRole::Tutor.as_str()))
            .count(&self.db)
            .await?;
        let classes = Classes::find().count(&self.db).await?;
        let todays_schedules = ClassSchedules::find()
            .filter(class_schedules::Column::ScheduleDate.eq(today))
            .filter(class_schedules::Column::Status.ne(ScheduleStatus::Cancelled.as_str()))
            .count(&self.db)
            .await?;

        let pending_fee_total = Fees::find()
            .select_only()
            .column_as(fees::Column::Amount.sum(), "total")
            .filter(fees::Column::Status.eq(PaymentStatus::Pending.as_str()))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await?
            .flatten();

        let (start, end) = month_timestamp_range(month)?;
        let paid_fee_total_this_month = Fees::find()
            .select_only()
            .column_as(fees::Column::Amount.sum(), "total")
            .filter(fees::Column::Status.eq(PaymentStatus::Paid.as_str()))
            .filter(fees::Column::PaidAt.gte(start))
            .filter(fees::Column::PaidAt.lt(end))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await?
            .flatten();

        Ok(DashboardSummary {
            students,
            tutors,
            classes,
            todays_schedules,
            pending_fee_total: round_cents(pending_fee_total.unwrap_or_default()),
            paid_fee_total_this_month: round_cents(paid_fee_total_this_month.unwrap_or_default()),
            currency: String::new(),
        })
    }
}
