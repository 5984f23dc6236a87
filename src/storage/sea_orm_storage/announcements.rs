//! 公告存储操作

use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::SeaOrmStorage;
use super::notifications::insert_notifications_in_batches;
use crate::entity::prelude::{Announcements, ClassStudents, Subjects, Users};
use crate::entity::{announcements, class_students, notifications, subjects, users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    announcements::{
        entities::{Announcement, Audience},
        requests::{AnnouncementListQuery, CreateAnnouncementRequest},
        responses::AnnouncementListResponse,
    },
    notifications::entities::NotificationKind,
    users::entities::{UserRole, UserStatus},
};

impl SeaOrmStorage {
    /// 解析公告收件人，返回去重后升序的用户 ID
    ///
    /// 指定班级时，学生取班级成员，教师取该班科目的任课教师；只包含正常状态的用户。
    pub async fn resolve_audience_impl(
        &self,
        audience: Audience,
        class_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        let roles: Vec<&str> = audience.roles().iter().map(|r| r.as_str()).collect();

        let mut select = Users::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::Role.is_in(roles))
            .filter(users::Column::Status.eq(UserStatus::Active.as_str()));

        if let Some(class_id) = class_id {
            let mut members: BTreeSet<i64> = BTreeSet::new();
            if audience.roles().contains(&UserRole::Student) {
                let students: Vec<i64> = ClassStudents::find()
                    .select_only()
                    .column(class_students::Column::StudentId)
                    .filter(class_students::Column::ClassId.eq(class_id))
                    .into_tuple()
                    .all(&self.db)
                    .await?;
                members.extend(students);
            }
            if audience.roles().contains(&UserRole::Tutor) {
                let tutors: Vec<Option<i64>> = Subjects::find()
                    .select_only()
                    .column(subjects::Column::TutorId)
                    .filter(subjects::Column::ClassId.eq(class_id))
                    .into_tuple()
                    .all(&self.db)
                    .await?;
                members.extend(tutors.into_iter().flatten());
            }
            select = select.filter(users::Column::Id.is_in(members));
        }

        let ids: Vec<i64> = select
            .order_by_asc(users::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// 公告与通知在同一事务内写入
    pub async fn create_announcement_impl(
        &self,
        req: CreateAnnouncementRequest,
        created_by: i64,
        recipients: &[i64],
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let announcement = announcements::ActiveModel {
            title: Set(req.title.clone()),
            message: Set(req.message.clone()),
            audience: Set(req.audience.to_string()),
            class_id: Set(req.class_id),
            created_by: Set(Some(created_by)),
            send_sms: Set(req.send_sms),
            recipients: Set(recipients.len() as i32),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if !recipients.is_empty() {
            let rows = recipients
                .iter()
                .map(|&user_id| notifications::ActiveModel {
                    user_id: Set(user_id),
                    announcement_id: Set(Some(announcement.id)),
                    kind: Set(NotificationKind::Announcement.to_string()),
                    title: Set(req.title.clone()),
                    message: Set(req.message.clone()),
                    is_read: Set(false),
                    created_at: Set(now),
                    ..Default::default()
                })
                .collect();
            insert_notifications_in_batches(&txn, rows).await?;
        }

        txn.commit().await?;
        Ok(announcement.into_announcement())
    }

    pub async fn list_announcements_with_pagination_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        let (page, size) = query.pagination.normalized();

        let paginator = Announcements::find()
            .order_by_desc(announcements::Column::CreatedAt)
            .order_by_desc(announcements::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(AnnouncementListResponse {
            items: rows.into_iter().map(|m| m.into_announcement()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 删除公告，关联通知随外键级联删除
    pub async fn delete_announcement_impl(&self, announcement_id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(announcement_id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
