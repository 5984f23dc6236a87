//! 学习资料存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::SeaOrmStorage;
use crate::entity::prelude::{StudyMaterials, Subjects};
use crate::entity::{study_materials, subjects};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo, page_params,
    materials::{
        entities::{Material, NewMaterial},
        requests::MaterialListQuery,
        responses::MaterialListResponse,
    },
};

impl SeaOrmStorage {
    /// 文件落盘后写入元数据
    pub async fn create_material_impl(&self, material: NewMaterial) -> Result<Material> {
        let model = study_materials::ActiveModel {
            subject_id: Set(material.subject_id),
            uploaded_by: Set(Some(material.uploaded_by)),
            title: Set(material.title),
            description: Set(material.description),
            original_name: Set(material.original_name),
            stored_name: Set(material.stored_name),
            file_size: Set(material.file_size),
            mime_type: Set(material.mime_type),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            TutorHubError::database_operation(format!("Failed to save material: {e}"))
        })?;

        Ok(result.into_material())
    }

    pub async fn get_material_by_id_impl(&self, material_id: i64) -> Result<Option<Material>> {
        Ok(StudyMaterials::find_by_id(material_id)
            .one(&self.db)
            .await?
            .map(|m| m.into_material()))
    }

    /// 分页列出资料；按班级筛选时包含该班所有科目的资料
    pub async fn list_materials_with_pagination_impl(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = StudyMaterials::find();
        if let Some(subject_id) = query.subject_id {
            select = select.filter(study_materials::Column::SubjectId.eq(subject_id));
        }
        if let Some(class_id) = query.class_id {
            let subject_ids: Vec<i64> = Subjects::find()
                .select_only()
                .column(subjects::Column::Id)
                .filter(subjects::Column::ClassId.eq(class_id))
                .into_tuple()
                .all(&self.db)
                .await?;
            select = select.filter(study_materials::Column::SubjectId.is_in(subject_ids));
        }

        let paginator = select
            .order_by_desc(study_materials::Column::CreatedAt)
            .order_by_desc(study_materials::Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        Ok(MaterialListResponse {
            items: rows.into_iter().map(|m| m.into_material()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn delete_material_impl(&self, material_id: i64) -> Result<bool> {
        let result = StudyMaterials::delete_by_id(material_id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
