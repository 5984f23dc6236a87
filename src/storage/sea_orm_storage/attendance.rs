//! 考勤存储操作

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};

use super::SeaOrmStorage;
use crate::entity::prelude::Attendances;
use crate::entity::{attendances, class_schedules};
use crate::errors::Result;
use crate::models::{
    attendance::{
        entities::{Attendance, AttendanceStatus, AttendanceSummary},
        requests::{AttendanceRecordInput, AttendanceSummaryQuery},
    },
    schedules::entities::ScheduleStatus,
};

impl SeaOrmStorage {
    /// 按 (schedule_id, student_id) upsert，整批在一个事务内
    pub async fn mark_attendance_impl(
        &self,
        schedule_id: i64,
        marked_by: i64,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Vec<Attendance>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        for record in records {
            let model = attendances::ActiveModel {
                schedule_id: Set(schedule_id),
                student_id: Set(record.student_id),
                status: Set(record.status.to_string()),
                remarks: Set(record.remarks),
                marked_by: Set(Some(marked_by)),
                marked_at: Set(now),
                ..Default::default()
            };
            Attendances::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        attendances::Column::ScheduleId,
                        attendances::Column::StudentId,
                    ])
                    .update_columns([
                        attendances::Column::Status,
                        attendances::Column::Remarks,
                        attendances::Column::MarkedBy,
                        attendances::Column::MarkedAt,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        self.list_attendance_impl(schedule_id).await
    }

    pub async fn list_attendance_impl(&self, schedule_id: i64) -> Result<Vec<Attendance>> {
        let rows = Attendances::find()
            .filter(attendances::Column::ScheduleId.eq(schedule_id))
            .order_by_asc(attendances::Column::StudentId)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 学生考勤汇总，只统计状态为 completed 的课程
    pub async fn attendance_summary_impl(
        &self,
        student_id: i64,
        query: AttendanceSummaryQuery,
    ) -> Result<AttendanceSummary> {
        let mut select = Attendances::find()
            .select_only()
            .column(attendances::Column::Status)
            .join(JoinType::InnerJoin, attendances::Relation::Schedule.def())
            .filter(attendances::Column::StudentId.eq(student_id))
            .filter(class_schedules::Column::Status.eq(ScheduleStatus::Completed.as_str()));

        if let Some(from) = query.date_from {
            select = select.filter(class_schedules::Column::ScheduleDate.gte(from));
        }
        if let Some(to) = query.date_to {
            select = select.filter(class_schedules::Column::ScheduleDate.lte(to));
        }

        let statuses: Vec<String> = select.into_tuple().all(&self.db).await?;

        Ok(AttendanceSummary::from_statuses(
            student_id,
            statuses
                .iter()
                .filter_map(|s| s.parse::<AttendanceStatus>().ok()),
        ))
    }
}
