//! 工资存储操作

use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use super::{SeaOrmStorage, inserted_rows};
use crate::entity::prelude::{ClassSchedules, Salaries, TutorProfiles, Users};
use crate::entity::{class_schedules, salaries, tutor_profiles, users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, page_params,
    fees::entities::PaymentStatus,
    salaries::{
        entities::{Salary, SalaryBreakdown, SalaryGeneration},
        requests::SalaryListQuery,
        responses::SalaryListResponse,
    },
    schedules::entities::ScheduleStatus,
    users::entities::{UserRole, UserStatus},
};
use crate::utils::dates::month_bounds;

impl SeaOrmStorage {
    /// 为所有在职教师生成某月工资：底薪 + 当月已完成课次 × 课时费
    pub async fn generate_salaries_impl(&self, month: &str) -> Result<SalaryGeneration> {
        let (first, last) = month_bounds(month)?;
        let now = chrono::Utc::now().timestamp();

        let tutor_ids: Vec<i64> = Users::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::Role.eq(UserRole::Tutor.as_str()))
            .filter(users::Column::Status.eq(UserStatus::Active.as_str()))
            .into_tuple()
            .all(&self.db)
            .await?;

        let profiles = TutorProfiles::find()
            .filter(tutor_profiles::Column::UserId.is_in(tutor_ids.clone()))
            .order_by_asc(tutor_profiles::Column::UserId)
            .all(&self.db)
            .await?;

        let completed: Vec<i64> = ClassSchedules::find()
            .select_only()
            .column(class_schedules::Column::TutorId)
            .filter(class_schedules::Column::TutorId.is_in(tutor_ids))
            .filter(class_schedules::Column::Status.eq(ScheduleStatus::Completed.as_str()))
            .filter(class_schedules::Column::ScheduleDate.between(first, last))
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut sessions: HashMap<i64, i32> = HashMap::new();
        for tutor_id in completed {
            *sessions.entry(tutor_id).or_default() += 1;
        }

        let txn = self.db.begin().await?;
        let mut created = Vec::new();
        let mut skipped = 0;

        for profile in profiles {
            let breakdown = SalaryBreakdown::compute(
                profile.base_salary,
                sessions.get(&profile.user_id).copied().unwrap_or_default(),
                profile.per_session_rate,
            );
            let model = salaries::ActiveModel {
                tutor_id: Set(profile.user_id),
                month: Set(month.to_string()),
                base_amount: Set(breakdown.base_amount),
                sessions_count: Set(breakdown.sessions_count),
                session_amount: Set(breakdown.session_amount),
                total_amount: Set(breakdown.total_amount),
                status: Set(PaymentStatus::Pending.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let rows = inserted_rows(
                Salaries::insert(model)
                    .on_conflict(
                        OnConflict::columns([salaries::Column::TutorId, salaries::Column::Month])
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(&txn)
                    .await,
            )?;

            if rows == 0 {
                skipped += 1;
                continue;
            }
            if let Some(salary) = Salaries::find()
                .filter(salaries::Column::TutorId.eq(profile.user_id))
                .filter(salaries::Column::Month.eq(month))
                .one(&txn)
                .await?
            {
                created.push(salary.into_salary());
            }
        }

        txn.commit().await?;
        Ok(SalaryGeneration { created, skipped })
    }

    pub async fn get_salary_by_id_impl(&self, salary_id: i64) -> Result<Option<Salary>> {
        Ok(Salaries::find_by_id(salary_id)
            .one(&self.db)
            .await?
            .map(|m| m.into_salary()))
    }

    pub async fn list_salaries_with_pagination_impl(
        &self,
        query: SalaryListQuery,
    ) -> Result<SalaryListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Salaries::find();
        if let Some(tutor_id) = query.tutor_id {
            select = select.filter(salaries::Column::TutorId.eq(tutor_id));
        }
        if let Some(ref month) = query.month {
            select = select.filter(salaries::Column::Month.eq(month.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(salaries::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(salaries::Column::Month)
            .order_by_asc(salaries::Column::TutorId)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(SalaryListResponse {
            items: rows.into_iter().map(|m| m.into_salary()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// pending -> paid，已支付时返回 None
    pub async fn mark_salary_paid_impl(&self, salary_id: i64) -> Result<Option<Salary>> {
        let now = chrono::Utc::now().timestamp();

        let result = Salaries::update_many()
            .col_expr(
                salaries::Column::Status,
                sea_orm::sea_query::Expr::value(PaymentStatus::Paid.as_str()),
            )
            .col_expr(salaries::Column::PaidAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(salaries::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(salaries::Column::Id.eq(salary_id))
            .filter(salaries::Column::Status.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_salary_by_id_impl(salary_id).await
    }
}
