//! 教师存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::users::{insert_user, update_user_email};
use crate::entity::prelude::{TutorProfiles, Users};
use crate::entity::{tutor_profiles, users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, page_params,
    tutors::{
        entities::{Tutor, TutorProfile},
        requests::{CreateTutorRequest, TutorListQuery, UpdateTutorRequest},
        responses::TutorListResponse,
    },
    users::{entities::UserRole, requests::NewUser},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建教师：账号与档案同一事务
    pub async fn create_tutor_impl(&self, user: NewUser, req: CreateTutorRequest) -> Result<Tutor> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let user_model = insert_user(&txn, user).await?;

        let profile = tutor_profiles::ActiveModel {
            user_id: Set(user_model.id),
            full_name: Set(req.full_name),
            phone: Set(self.cipher.encrypt_opt(req.phone)?),
            address: Set(self.cipher.encrypt_opt(req.address)?),
            national_id: Set(self.cipher.encrypt_opt(req.national_id)?),
            qualification: Set(req.qualification),
            specialization: Set(req.specialization),
            base_salary: Set(req.base_salary),
            per_session_rate: Set(req.per_session_rate),
            photo_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(Tutor {
            user: user_model.into_user(),
            profile: profile.into_profile(self.cipher)?,
        })
    }

    pub async fn get_tutor_impl(&self, id: i64) -> Result<Option<Tutor>> {
        let Some(user) = Users::find_by_id(id)
            .filter(users::Column::Role.eq(UserRole::Tutor.as_str()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.assemble_tutors(vec![user]).await?.pop())
    }

    pub async fn get_tutor_profile_impl(&self, user_id: i64) -> Result<Option<TutorProfile>> {
        TutorProfiles::find()
            .filter(tutor_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(|m| m.into_profile(self.cipher))
            .transpose()
    }

    pub async fn list_tutors_with_pagination_impl(
        &self,
        query: TutorListQuery,
    ) -> Result<TutorListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Users::find().filter(users::Column::Role.eq(UserRole::Tutor.as_str()));

        if let Some(status) = query.status {
            select = select.filter(users::Column::Status.eq(status.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            let by_profile: Vec<i64> = TutorProfiles::find()
                .select_only()
                .column(tutor_profiles::Column::UserId)
                .filter(
                    Condition::any()
                        .add(tutor_profiles::Column::FullName.contains(&escaped))
                        .add(tutor_profiles::Column::Specialization.contains(&escaped)),
                )
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(
                Condition::any()
                    .add(users::Column::Username.contains(&escaped))
                    .add(users::Column::Email.contains(&escaped))
                    .add(users::Column::Id.is_in(by_profile)),
            );
        }

        let paginator = select
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(TutorListResponse {
            items: self.assemble_tutors(rows).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_tutor_impl(
        &self,
        id: i64,
        req: UpdateTutorRequest,
    ) -> Result<Option<Tutor>> {
        let txn = self.db.begin().await?;

        let Some(profile) = TutorProfiles::find()
            .filter(tutor_profiles::Column::UserId.eq(id))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        if let Some(email) = req.email {
            update_user_email(&txn, id, email).await?;
        }

        let mut model: tutor_profiles::ActiveModel = profile.into();
        if let Some(full_name) = req.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(phone) = req.phone {
            model.phone = Set(Some(self.cipher.encrypt(&phone)?));
        }
        if let Some(address) = req.address {
            model.address = Set(Some(self.cipher.encrypt(&address)?));
        }
        if let Some(national_id) = req.national_id {
            model.national_id = Set(Some(self.cipher.encrypt(&national_id)?));
        }
        if let Some(qualification) = req.qualification {
            model.qualification = Set(Some(qualification));
        }
        if let Some(specialization) = req.specialization {
            model.specialization = Set(Some(specialization));
        }
        if let Some(base_salary) = req.base_salary {
            model.base_salary = Set(base_salary);
        }
        if let Some(rate) = req.per_session_rate {
            model.per_session_rate = Set(rate);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());
        model.update(&txn).await?;

        txn.commit().await?;
        self.get_tutor_impl(id).await
    }

    pub async fn delete_tutor_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_many()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Role.eq(UserRole::Tutor.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn update_tutor_photo_impl(&self, id: i64, photo_path: &str) -> Result<bool> {
        let result = TutorProfiles::update_many()
            .col_expr(
                tutor_profiles::Column::PhotoPath,
                sea_orm::sea_query::Expr::value(photo_path),
            )
            .col_expr(
                tutor_profiles::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(tutor_profiles::Column::UserId.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn assemble_tutors(&self, rows: Vec<users::Model>) -> Result<Vec<Tutor>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|u| u.id).collect();

        let mut profiles: HashMap<i64, tutor_profiles::Model> = TutorProfiles::find()
            .filter(tutor_profiles::Column::UserId.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p))
            .collect();

        let mut tutors = Vec::with_capacity(rows.len());
        for user in rows {
            let Some(profile) = profiles.remove(&user.id) else {
                tracing::warn!("Tutor {} has no profile row", user.id);
                continue;
            };
            tutors.push(Tutor {
                profile: profile.into_profile(self.cipher)?,
                user: user.into_user(),
            });
        }
        Ok(tutors)
    }
}
