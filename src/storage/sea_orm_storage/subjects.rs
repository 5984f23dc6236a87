//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::Subjects;
use crate::entity::subjects;
use crate::errors::Result;
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建科目，同一班级内名称唯一
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = subjects::ActiveModel {
            class_id: Set(req.class_id),
            tutor_id: Set(req.tutor_id),
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        Ok(Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await?
            .map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self, query: SubjectListQuery) -> Result<Vec<Subject>> {
        let mut select = Subjects::find();
        if let Some(class_id) = query.class_id {
            select = select.filter(subjects::Column::ClassId.eq(class_id));
        }
        if let Some(tutor_id) = query.tutor_id {
            select = select.filter(subjects::Column::TutorId.eq(tutor_id));
        }

        let rows = select
            .order_by_asc(subjects::Column::ClassId)
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let Some(existing) = Subjects::find_by_id(subject_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: subjects::ActiveModel = existing.into();
        if let Some(tutor_id) = update.tutor_id {
            model.tutor_id = Set(Some(tutor_id));
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        Ok(Some(model.update(&self.db).await?.into_subject()))
    }

    pub async fn delete_subject_impl(&self, subject_id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(subject_id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
