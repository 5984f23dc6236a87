//! 课程安排存储操作
//!
//! 同一教师同一天内的非取消课程不得时间重叠。冲突检测与写入在同一事务内完成，
//! 检测本身是先读后写，并发下仍可能漏判。

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::SeaOrmStorage;
use crate::entity::prelude::{ClassSchedules, ClassStudents};
use crate::entity::{class_schedules, class_students};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo, page_params,
    schedules::{
        entities::{Schedule, ScheduleDraft, ScheduleStatus},
        requests::ScheduleListQuery,
        responses::ScheduleListResponse,
    },
};

/// 查找与给定时段冲突的课程
async fn find_overlap<C: ConnectionTrait>(
    db: &C,
    tutor_id: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    exclude_id: Option<i64>,
) -> Result<Option<Schedule>> {
    let mut select = ClassSchedules::find()
        .filter(class_schedules::Column::TutorId.eq(tutor_id))
        .filter(class_schedules::Column::ScheduleDate.eq(date))
        .filter(class_schedules::Column::Status.ne(ScheduleStatus::Cancelled.as_str()));
    if let Some(id) = exclude_id {
        select = select.filter(class_schedules::Column::Id.ne(id));
    }

    let same_day = select
        .order_by_asc(class_schedules::Column::StartTime)
        .all(db)
        .await?;

    Ok(same_day
        .into_iter()
        .map(|m| m.into_schedule())
        .find(|s| s.status.blocks_time() && s.overlaps(start, end)))
}

fn overlap_error(existing: &Schedule) -> TutorHubError {
    TutorHubError::conflict(format!(
        "Tutor already has schedule #{} on {} from {} to {}",
        existing.id,
        existing.schedule_date,
        existing.start_time.format("%H:%M"),
        existing.end_time.format("%H:%M"),
    ))
}

impl SeaOrmStorage {
    /// 创建课程，与同一教师当天的课程时间重叠时返回 Conflict
    pub async fn create_schedule_impl(&self, draft: ScheduleDraft) -> Result<Schedule> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        if let Some(existing) = find_overlap(
            &txn,
            draft.tutor_id,
            draft.schedule_date,
            draft.start_time,
            draft.end_time,
            None,
        )
        .await?
        {
            return Err(overlap_error(&existing));
        }

        let created = class_schedules::ActiveModel {
            class_id: Set(draft.class_id),
            subject_id: Set(draft.subject_id),
            tutor_id: Set(draft.tutor_id),
            schedule_date: Set(draft.schedule_date),
            start_time: Set(draft.start_time),
            end_time: Set(draft.end_time),
            room: Set(draft.room),
            notes: Set(draft.notes),
            status: Set(ScheduleStatus::Upcoming.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created.into_schedule())
    }

    pub async fn get_schedule_by_id_impl(&self, schedule_id: i64) -> Result<Option<Schedule>> {
        Ok(ClassSchedules::find_by_id(schedule_id)
            .one(&self.db)
            .await?
            .map(|m| m.into_schedule()))
    }

    /// 分页列出课程，按日期、开始时间升序
    pub async fn list_schedules_with_pagination_impl(
        &self,
        query: ScheduleListQuery,
    ) -> Result<ScheduleListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = ClassSchedules::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(class_schedules::Column::ClassId.eq(class_id));
        }
        if let Some(tutor_id) = query.tutor_id {
            select = select.filter(class_schedules::Column::TutorId.eq(tutor_id));
        }
        if let Some(from) = query.date_from {
            select = select.filter(class_schedules::Column::ScheduleDate.gte(from));
        }
        if let Some(to) = query.date_to {
            select = select.filter(class_schedules::Column::ScheduleDate.lte(to));
        }
        if let Some(status) = query.status {
            select = select.filter(class_schedules::Column::Status.eq(status.as_str()));
        }
        // 学生只能看到自己所在班级
        if let Some(student_id) = query.student_id {
            let class_ids: Vec<i64> = ClassStudents::find()
                .select_only()
                .column(class_students::Column::ClassId)
                .filter(class_students::Column::StudentId.eq(student_id))
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(class_schedules::Column::ClassId.is_in(class_ids));
        }

        let paginator = select
            .order_by_asc(class_schedules::Column::ScheduleDate)
            .order_by_asc(class_schedules::Column::StartTime)
            .order_by_asc(class_schedules::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(ScheduleListResponse {
            items: rows.into_iter().map(|m| m.into_schedule()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新课程，冲突检测排除自身
    pub async fn update_schedule_impl(
        &self,
        schedule_id: i64,
        draft: ScheduleDraft,
    ) -> Result<Option<Schedule>> {
        let txn = self.db.begin().await?;

        let Some(existing) = ClassSchedules::find_by_id(schedule_id).one(&txn).await? else {
            return Ok(None);
        };

        if let Some(other) = find_overlap(
            &txn,
            draft.tutor_id,
            draft.schedule_date,
            draft.start_time,
            draft.end_time,
            Some(schedule_id),
        )
        .await?
        {
            return Err(overlap_error(&other));
        }

        let mut model: class_schedules::ActiveModel = existing.into();
        model.class_id = Set(draft.class_id);
        model.subject_id = Set(draft.subject_id);
        model.tutor_id = Set(draft.tutor_id);
        model.schedule_date = Set(draft.schedule_date);
        model.start_time = Set(draft.start_time);
        model.end_time = Set(draft.end_time);
        model.room = Set(draft.room);
        model.notes = Set(draft.notes);
        model.updated_at = Set(chrono::Utc::now().timestamp());
        let updated = model.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(updated.into_schedule()))
    }

    /// 条件更新状态：仅当当前状态为 `from` 时生效，否则返回 None
    pub async fn update_schedule_status_impl(
        &self,
        schedule_id: i64,
        from: ScheduleStatus,
        to: ScheduleStatus,
    ) -> Result<Option<Schedule>> {
        let result = ClassSchedules::update_many()
            .col_expr(
                class_schedules::Column::Status,
                sea_orm::sea_query::Expr::value(to.as_str()),
            )
            .col_expr(
                class_schedules::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(class_schedules::Column::Id.eq(schedule_id))
            .filter(class_schedules::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_schedule_by_id_impl(schedule_id).await
    }

    pub async fn delete_schedule_impl(&self, schedule_id: i64) -> Result<bool> {
        let result = ClassSchedules::delete_by_id(schedule_id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
