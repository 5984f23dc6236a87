//! 站内通知存储操作
//!
//! 所有读写都限定在 `user_id` 之下，用户只能操作自己的通知。

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::SeaOrmStorage;
use crate::entity::notifications;
use crate::entity::prelude::Notifications;
use crate::errors::Result;
use crate::models::{
    PaginationInfo, page_params,
    notifications::{
        entities::NewNotification, requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
};

/// 单条 INSERT 的最大行数，每行约 8 个绑定参数，需低于 SQLite/Postgres 的参数上限
pub(super) const NOTIFICATION_INSERT_BATCH: usize = 500;

/// 分批写入通知，调用方负责提供事务
pub(super) async fn insert_notifications_in_batches<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<notifications::ActiveModel>,
) -> Result<()> {
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let batch: Vec<_> = rows.by_ref().take(NOTIFICATION_INSERT_BATCH).collect();
        Notifications::insert_many(batch)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

impl SeaOrmStorage {
    pub async fn create_notifications_impl(
        &self,
        items: Vec<NewNotification>,
    ) -> Result<u64> {
        if items.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let count = items.len() as u64;
        let rows = items
            .into_iter()
            .map(|n| notifications::ActiveModel {
                user_id: Set(n.user_id),
                announcement_id: Set(n.announcement_id),
                kind: Set(n.kind.to_string()),
                title: Set(n.title),
                message: Set(n.message),
                is_read: Set(false),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        let txn = self.db.begin().await?;
        insert_notifications_in_batches(&txn, rows).await?;
        txn.commit().await?;
        Ok(count)
    }

    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Notifications::find().filter(notifications::Column::UserId.eq(user_id));
        if query.unread_only {
            select = select.filter(notifications::Column::IsRead.eq(false));
        }

        let paginator = select
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(NotificationListResponse {
            items: rows.into_iter().map(|m| m.into_notification()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        let count = Notifications::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// 标记单条已读；不存在或不属于该用户时返回 false，已读的重复标记返回 true
    pub async fn mark_notification_read_impl(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<bool> {
        let exists = Notifications::find()
            .filter(notifications::Column::Id.eq(notification_id))
            .filter(notifications::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .is_some();
        if !exists {
            return Ok(false);
        }

        Notifications::update_many()
            .col_expr(
                notifications::Column::IsRead,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(notifications::Column::Id.eq(notification_id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(true)
    }

    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(
                notifications::Column::IsRead,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_notification_impl(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(notifications::Column::Id.eq(notification_id))
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
