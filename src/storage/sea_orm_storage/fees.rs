//! 学费存储操作
//!
//! `(student_id, month)` 唯一，月度生成通过 `ON CONFLICT DO NOTHING` 保证幂等。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use super::{SeaOrmStorage, inserted_rows};
use crate::entity::prelude::{ClassStudents, Classes, Fees, Users};
use crate::entity::{class_students, fees, users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, page_params,
    fees::{
        entities::{Fee, FeeGeneration, PaymentStatus},
        requests::{FeeListQuery, PayFeeRequest},
        responses::FeeListResponse,
    },
    salaries::entities::round_cents,
    users::entities::{UserRole, UserStatus},
};

impl SeaOrmStorage {
    /// 为所有在读学生生成某月学费，金额为所在班级月费之和
    ///
    /// 未加入任何班级的学生不生成；已存在的记录计入 skipped。
    pub async fn generate_fees_impl(
        &self,
        month: &str,
        due_date: NaiveDate,
    ) -> Result<FeeGeneration> {
        let now = chrono::Utc::now().timestamp();

        let student_ids: Vec<i64> = Users::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::Role.eq(UserRole::Student.as_str()))
            .filter(users::Column::Status.eq(UserStatus::Active.as_str()))
            .into_tuple()
            .all(&self.db)
            .await?;

        let fees_by_class: BTreeMap<i64, f64> = Classes::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.monthly_fee))
            .collect();

        let mut amounts: BTreeMap<i64, f64> = BTreeMap::new();
        for enrollment in ClassStudents::find()
            .filter(class_students::Column::StudentId.is_in(student_ids))
            .all(&self.db)
            .await?
        {
            let fee = fees_by_class
                .get(&enrollment.class_id)
                .copied()
                .unwrap_or_default();
            *amounts.entry(enrollment.student_id).or_default() += fee;
        }

        let txn = self.db.begin().await?;
        let mut created = Vec::new();
        let mut skipped = 0;

        for (student_id, amount) in amounts {
            let model = fees::ActiveModel {
                student_id: Set(student_id),
                month: Set(month.to_string()),
                amount: Set(round_cents(amount)),
                due_date: Set(due_date),
                status: Set(PaymentStatus::Pending.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let rows = inserted_rows(
                Fees::insert(model)
                    .on_conflict(
                        OnConflict::columns([fees::Column::StudentId, fees::Column::Month])
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
            if let Some(fee) = Fees::find()
                .filter(fees::Column::StudentId.eq(student_id))
                .filter(fees::Column::Month.eq(month))
                .one(&txn)
                .await?
            {
                created.push(fee.into_fee());
            }
        }

        txn.commit().await?;
        Ok(FeeGeneration { created, skipped })
    }

    pub async fn get_fee_by_id_impl(&self, fee_id: i64) -> Result<Option<Fee>> {
        Ok(Fees::find_by_id(fee_id)
            .one(&self.db)
            .await?
            .map(|m| m.into_fee()))
    }

    pub async fn list_fees_with_pagination_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<FeeListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Fees::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(fees::Column::StudentId.eq(student_id));
        }
        if let Some(ref month) = query.month {
            select = select.filter(fees::Column::Month.eq(month.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(fees::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(fees::Column::Month)
            .order_by_asc(fees::Column::StudentId)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(FeeListResponse {
            items: rows.into_iter().map(|m| m.into_fee()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// pending -> paid，状态已不是 pending 时返回 None
    pub async fn mark_fee_paid_impl(
        &self,
        fee_id: i64,
        payment: PayFeeRequest,
    ) -> Result<Option<Fee>> {
        let now = chrono::Utc::now().timestamp();

        let result = Fees::update_many()
            .col_expr(
                fees::Column::Status,
                sea_orm::sea_query::Expr::value(PaymentStatus::Paid.as_str()),
            )
            .col_expr(fees::Column::PaidAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(
                fees::Column::PaymentMethod,
                sea_orm::sea_query::Expr::value(payment.payment_method),
            )
            .col_expr(
                fees::Column::Notes,
                sea_orm::sea_query::Expr::value(payment.notes),
            )
            .col_expr(fees::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(fees::Column::Id.eq(fee_id))
            .filter(fees::Column::Status.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_fee_by_id_impl(fee_id).await
    }

    pub async fn delete_pending_fee_impl(&self, fee_id: i64) -> Result<bool> {
        let result = Fees::delete_many()
            .filter(fees::Column::Id.eq(fee_id))
            .filter(fees::Column::Status.eq(PaymentStatus::Pending.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
