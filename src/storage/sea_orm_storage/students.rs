//! 学生存储操作
//!
//! 学生身份即 `users.id`，档案行与账号行一对一，班级关系存于 `class_students`。

use std::collections::{BTreeSet, HashMap};

use super::SeaOrmStorage;
use super::users::{insert_user, update_user_email};
use crate::entity::prelude::{ClassStudents, StudentProfiles, Users};
use crate::entity::{class_students, student_profiles, users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo, page_params,
    students::{
        entities::{Student, StudentProfile},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{entities::UserRole, requests::NewUser},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生：账号、档案、初始班级在同一事务内写入
    pub async fn create_student_impl(
        &self,
        user: NewUser,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let user_model = insert_user(&txn, user).await?;

        let profile = student_profiles::ActiveModel {
            user_id: Set(user_model.id),
            full_name: Set(req.full_name),
            phone: Set(self.cipher.encrypt_opt(req.phone)?),
            guardian_name: Set(req.guardian_name),
            guardian_phone: Set(self.cipher.encrypt_opt(req.guardian_phone)?),
            address: Set(self.cipher.encrypt_opt(req.address)?),
            date_of_birth: Set(req.date_of_birth),
            school: Set(req.school),
            photo_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let class_ids: Vec<i64> = req
            .class_ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for class_id in &class_ids {
            class_students::ActiveModel {
                class_id: Set(*class_id),
                student_id: Set(user_model.id),
                enrolled_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(Student {
            user: user_model.into_user(),
            profile: profile.into_profile(self.cipher)?,
            class_ids,
        })
    }

    pub async fn get_student_impl(&self, id: i64) -> Result<Option<Student>> {
        let Some(user) = Users::find_by_id(id)
            .filter(users::Column::Role.eq(UserRole::Student.as_str()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.assemble_students(vec![user]).await?.pop())
    }

    pub async fn get_student_profile_impl(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        StudentProfiles::find()
            .filter(student_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(|m| m.into_profile(self.cipher))
            .transpose()
    }

    /// 分页列出学生，支持按用户名/邮箱/姓名搜索和按班级筛选
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select =
            Users::find().filter(users::Column::Role.eq(UserRole::Student.as_str()));

        if let Some(status) = query.status {
            select = select.filter(users::Column::Status.eq(status.as_str()));
        }

        if let Some(class_id) = query.class_id {
            let ids: Vec<i64> = ClassStudents::find()
                .select_only()
                .column(class_students::Column::StudentId)
                .filter(class_students::Column::ClassId.eq(class_id))
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(users::Column::Id.is_in(ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            let by_name: Vec<i64> = StudentProfiles::find()
                .select_only()
                .column(student_profiles::Column::UserId)
                .filter(student_profiles::Column::FullName.contains(&escaped))
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(
                Condition::any()
                    .add(users::Column::Username.contains(&escaped))
                    .add(users::Column::Email.contains(&escaped))
                    .add(users::Column::Id.is_in(by_name)),
            );
        }

        let paginator = select
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(StudentListResponse {
            items: self.assemble_students(rows).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新学生档案，未提供的字段保持不变
    pub async fn update_student_impl(
        &self,
        id: i64,
        req: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let txn = self.db.begin().await?;

        let Some(profile) = StudentProfiles::find()
            .filter(student_profiles::Column::UserId.eq(id))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        if let Some(email) = req.email {
            update_user_email(&txn, id, email).await?;
        }

        let mut model: student_profiles::ActiveModel = profile.into();
        if let Some(full_name) = req.full_name {
            model.full_name = Set(full_name);
        }
        if let Some(phone) = req.phone {
            model.phone = Set(Some(self.cipher.encrypt(&phone)?));
        }
        if let Some(guardian_name) = req.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = req.guardian_phone {
            model.guardian_phone = Set(Some(self.cipher.encrypt(&guardian_phone)?));
        }
        if let Some(address) = req.address {
            model.address = Set(Some(self.cipher.encrypt(&address)?));
        }
        if let Some(date_of_birth) = req.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(school) = req.school {
            model.school = Set(Some(school));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());
        model.update(&txn).await?;

        txn.commit().await?;
        self.get_student_impl(id).await
    }

    /// 删除学生账号（级联）
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_many()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Role.eq(UserRole::Student.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn update_student_photo_impl(&self, id: i64, photo_path: &str) -> Result<bool> {
        let result = StudentProfiles::update_many()
            .col_expr(
                student_profiles::Column::PhotoPath,
                sea_orm::sea_query::Expr::value(photo_path),
            )
            .col_expr(
                student_profiles::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(student_profiles::Column::UserId.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// 批量拼装学生：账号 + 解密后的档案 + 所在班级
    async fn assemble_students(
        &self,
        rows: Vec<users::Model>,
    ) -> Result<Vec<Student>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|u| u.id).collect();

        let mut profiles: HashMap<i64, student_profiles::Model> = StudentProfiles::find()
            .filter(student_profiles::Column::UserId.is_in(ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p))
            .collect();

        let mut classes: HashMap<i64, Vec<i64>> = HashMap::new();
        for enrollment in ClassStudents::find()
            .filter(class_students::Column::StudentId.is_in(ids))
            .order_by_asc(class_students::Column::ClassId)
            .all(&self.db)
            .await?
        {
            classes
                .entry(enrollment.student_id)
                .or_default()
                .push(enrollment.class_id);
        }

        let mut students = Vec::with_capacity(rows.len());
        for user in rows {
            let Some(profile) = profiles.remove(&user.id) else {
                tracing::warn!("Student {} has no profile row", user.id);
                continue;
            };
            students.push(Student {
                class_ids: classes.remove(&user.id).unwrap_or_default(),
                profile: profile.into_profile(self.cipher)?,
                user: user.into_user(),
            });
        }
        Ok(students)
    }
}
