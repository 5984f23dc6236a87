//! 班级与班级学生存储操作

use std::collections::{BTreeSet, HashMap};

use super::{SeaOrmStorage, inserted_rows};
use crate::entity::prelude::{ClassStudents, Classes, StudentProfiles, Subjects, Users};
use crate::entity::{class_students, classes, student_profiles, subjects, users};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo, page_params,
    classes::{
        entities::{Class, ClassStudent},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::{ClassListResponse, EnrollmentResult},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建班级，名称唯一
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = classes::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            monthly_fee: Set(req.monthly_fee),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Failed to query class: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Classes::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(classes::Column::Name.contains(&escaped));
        }

        let paginator = select
            .order_by_asc(classes::Column::Name)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(ClassListResponse {
            items: rows.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let Some(existing) = Classes::find_by_id(class_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: classes::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(monthly_fee) = update.monthly_fee {
            model.monthly_fee = Set(monthly_fee);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        Ok(Some(model.update(&self.db).await?.into_class()))
    }

    /// 删除班级，科目、课程、班级关系级联删除
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// 列出班级学生
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        let enrollments = ClassStudents::find()
            .filter(class_students::Column::ClassId.eq(class_id))
            .order_by_asc(class_students::Column::EnrolledAt)
            .order_by_asc(class_students::Column::StudentId)
            .all(&self.db)
            .await?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let usernames: HashMap<i64, String> = Users::find()
            .filter(users::Column::Id.is_in(ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let names: HashMap<i64, String> = StudentProfiles::find()
            .filter(student_profiles::Column::UserId.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p.full_name))
            .collect();

        Ok(enrollments
            .into_iter()
            .map(|e| ClassStudent {
                class_id: e.class_id,
                student_id: e.student_id,
                username: usernames.get(&e.student_id).cloned().unwrap_or_default(),
                full_name: names.get(&e.student_id).cloned().unwrap_or_default(),
                enrolled_at: crate::entity::to_datetime(e.enrolled_at),
            })
            .collect())
    }

    /// 批量加入班级；(class_id, student_id) 唯一，重复加入被忽略
    pub async fn enroll_students_impl(
        &self,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<EnrollmentResult> {
        let now = chrono::Utc::now().timestamp();
        let unique: BTreeSet<i64> = student_ids.iter().copied().collect();

        let txn = self.db.begin().await?;
        let mut enrolled = 0;
        for student_id in &unique {
            let model = class_students::ActiveModel {
                class_id: Set(class_id),
                student_id: Set(*student_id),
                enrolled_at: Set(now),
                ..Default::default()
            };
            let rows = inserted_rows(
                ClassStudents::insert(model)
                    .on_conflict(
                        OnConflict::columns([
                            class_students::Column::ClassId,
                            class_students::Column::StudentId,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .exec_without_returning(&txn)
                    .await,
            )?;
            enrolled += rows;
        }
        txn.commit().await?;

        Ok(EnrollmentResult {
            enrolled,
            already_enrolled: unique.len() as u64 - enrolled,
        })
    }

    pub async fn unenroll_student_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let result = ClassStudents::delete_many()
            .filter(class_students::Column::ClassId.eq(class_id))
            .filter(class_students::Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_student_enrolled_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassStudents::find()
            .filter(class_students::Column::ClassId.eq(class_id))
            .filter(class_students::Column::StudentId.eq(student_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 教师在该班级至少负责一个科目
    pub async fn tutor_teaches_class_impl(&self, tutor_id: i64, class_id: i64) -> Result<bool> {
        let count = Subjects::find()
            .filter(subjects::Column::ClassId.eq(class_id))
            .filter(subjects::Column::TutorId.eq(tutor_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
