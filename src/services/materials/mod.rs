pub mod upload;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    materials::{requests::MaterialListQuery, responses::MaterialResponse},
};
use crate::services::uploads::{self, MATERIALS};
use crate::services::{current_user, forbidden, not_found, storage_error};

super::lazy_service! {
    /// 学习资料
    MaterialService
}

impl MaterialService {
    pub async fn upload_material(
        &self,
        payload: actix_multipart::Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upload::upload_material(self, payload, request).await
    }

    pub async fn list_materials(
        &self,
        query: MaterialListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_materials_with_pagination(query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Material list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to retrieve material list")),
        }
    }

    pub async fn get_material(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_material_by_id(id).await {
            Ok(Some(material)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                MaterialResponse {
                    download_url: material.download_url(),
                    material,
                },
                "Material retrieved successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::MaterialNotFound, "Material not found")),
            Err(e) => Ok(storage_error(e, "Failed to retrieve material")),
        }
    }

    // 以原文件名作为附件下载
    pub async fn download_material(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.get_material_by_id(id).await {
            Ok(Some(material)) => uploads::serve_stored(
                MATERIALS,
                &material.stored_name,
                Some(&material.original_name),
            ),
            Ok(None) => Ok(not_found(ErrorCode::MaterialNotFound, "Material not found")),
            Err(e) => Ok(storage_error(e, "Failed to retrieve material")),
        }
    }

    /// 上传者或管理员可删除，文件删除失败不影响结果
    pub async fn delete_material(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        let material = match storage.get_material_by_id(id).await {
            Ok(Some(material)) => material,
            Ok(None) => return Ok(not_found(ErrorCode::MaterialNotFound, "Material not found")),
            Err(e) => return Ok(storage_error(e, "Failed to retrieve material")),
        };
        if !user.is_admin() && material.uploaded_by != Some(user.id) {
            return Ok(forbidden("Only the uploader or an admin can delete this material"));
        }

        match storage.delete_material(id).await {
            Ok(true) => {
                uploads::remove_stored(MATERIALS, &material.stored_name);
                info!("Material {} deleted by {}", id, user.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Material deleted")))
            }
            Ok(false) => Ok(not_found(ErrorCode::MaterialNotFound, "Material not found")),
            Err(e) => Ok(storage_error(e, "Material deletion failed")),
        }
    }
}
