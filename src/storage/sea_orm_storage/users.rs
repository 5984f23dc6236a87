//! 账号存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{AdminProfiles, StudentProfiles, TutorProfiles, Users};
use crate::entity::{admin_profiles, student_profiles, tutor_profiles, users};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{AdminProfile, Contact, User, UserStatus},
        requests::{NewAdminProfile, NewUser, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 插入账号行，供各角色的创建流程在事务内复用
pub(super) async fn insert_user<C: ConnectionTrait>(db: &C, user: NewUser) -> Result<users::Model> {
    let now = chrono::Utc::now().timestamp();

    let model = users::ActiveModel {
        username: Set(user.username),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        role: Set(user.role.to_string()),
        status: Set(UserStatus::Active.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// 修改账号邮箱
pub(super) async fn update_user_email<C: ConnectionTrait>(
    db: &C,
    id: i64,
    email: String,
) -> Result<()> {
    let model = users::ActiveModel {
        id: Set(id),
        email: Set(email),
        updated_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    };
    model.update(db).await?;
    Ok(())
}

impl SeaOrmStorage {
    /// 创建管理员账号及档案
    pub async fn create_admin_user_impl(
        &self,
        user: NewUser,
        profile: NewAdminProfile,
    ) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let created = insert_user(&txn, user).await?;
        admin_profiles::ActiveModel {
            user_id: Set(created.id),
            full_name: Set(profile.full_name),
            phone: Set(self.cipher.encrypt_opt(profile.phone)?),
            position: Set(profile.position),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created.into_user())
    }

    /// 通过 ID 获取账号
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取账号
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(identifier))
                    .add(users::Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出账号
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(users::Column::Username.contains(&escaped))
                    .add(users::Column::Email.contains(&escaped)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(users::Column::Role.eq(role.as_str()));
        }

        if let Some(status) = query.status {
            select = select.filter(users::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page - 1).await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 修改账号状态
    pub async fn update_user_status_impl(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: users::ActiveModel = existing.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model.update(&self.db).await?;
        Ok(Some(updated.into_user()))
    }

    /// 修改密码哈希
    pub async fn update_user_password_impl(&self, id: i64, password_hash: String) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                users::Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .col_expr(
                users::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(users::Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("Failed to update last login: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 删除账号，档案与关联行由外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// 统计账号数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Ok(Users::find().count(&self.db).await?)
    }

    pub async fn get_admin_profile_impl(&self, user_id: i64) -> Result<Option<AdminProfile>> {
        AdminProfiles::find()
            .filter(admin_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(|m| m.into_profile(self.cipher))
            .transpose()
    }

    /// 批量读取联系人，电话已解密
    pub async fn list_contacts_impl(&self, user_ids: &[i64]) -> Result<Vec<Contact>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut contacts: HashMap<i64, Contact> = HashMap::new();

        for p in StudentProfiles::find()
            .filter(student_profiles::Column::UserId.is_in(user_ids.to_vec()))
            .all(&self.db)
            .await?
        {
            contacts.insert(
                p.user_id,
                Contact {
                    user_id: p.user_id,
                    full_name: p.full_name,
                    phone: self.cipher.decrypt_opt(p.phone)?,
                    guardian_phone: self.cipher.decrypt_opt(p.guardian_phone)?,
                },
            );
        }

        for p in TutorProfiles::find()
            .filter(tutor_profiles::Column::UserId.is_in(user_ids.to_vec()))
            .all(&self.db)
            .await?
        {
            contacts.insert(
                p.user_id,
                Contact {
                    user_id: p.user_id,
                    full_name: p.full_name,
                    phone: self.cipher.decrypt_opt(p.phone)?,
                    guardian_phone: None,
                },
            );
        }

        for p in AdminProfiles::find()
            .filter(admin_profiles::Column::UserId.is_in(user_ids.to_vec()))
            .all(&self.db)
            .await?
        {
            contacts.insert(
                p.user_id,
                Contact {
                    user_id: p.user_id,
                    full_name: p.full_name,
                    phone: self.cipher.decrypt_opt(p.phone)?,
                    guardian_phone: None,
                },
            );
        }

        let mut contacts: Vec<Contact> = contacts.into_values().collect();
        contacts.sort_by_key(|c| c.user_id);
        Ok(contacts)
    }
}
