use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MaterialService;
use crate::models::{
    ApiResponse,
    materials::{entities::NewMaterial, responses::MaterialResponse},
    users::entities::User,
};
use crate::services::uploads::{self, StoredFile, UploadForm, UploadRules};
use crate::services::{current_user, field_error, forbidden, storage_error, validation_failed};
use crate::storage::Storage;
use crate::utils::validate::Validator;

/// 文件与表单字段都齐全后再做业务校验，任一失败都删除已落盘的文件
pub async fn upload_material(
    service: &MaterialService,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let (file, form) = match uploads::receive_single_file(payload, &UploadRules::material()).await
    {
        Ok(received) => received,
        Err(resp) => return Ok(resp),
    };

    match build_material(storage.as_ref(), &user, &file, &form).await {
        Ok(new_material) => match storage.create_material(new_material).await {
            Ok(material) => {
                info!(
                    "Material {} ({} bytes) uploaded by {}",
                    material.id, material.file_size, user.id
                );
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    MaterialResponse {
                        download_url: material.download_url(),
                        material,
                    },
                    "Material uploaded successfully",
                )))
            }
            Err(e) => {
                file.discard();
                Ok(storage_error(e, "Failed to save material"))
            }
        },
        Err(resp) => {
            file.discard();
            Ok(resp)
        }
    }
}

async fn build_material(
    storage: &dyn Storage,
    user: &User,
    file: &StoredFile,
    form: &UploadForm,
) -> Result<NewMaterial, HttpResponse> {
    let title = form.text("title").unwrap_or_default().to_string();
    let mut validator = Validator::new();
    validator
        .required("title", &title)
        .max_len("title", &title, 200);
    let subject_id = form.text("subject_id").and_then(|s| s.parse::<i64>().ok());
    validator.check(
        subject_id.is_some(),
        "subject_id",
        "The subject_id field is required",
    );
    validator.finish().map_err(validation_failed)?;
    let Some(subject_id) = subject_id else {
        return Err(field_error("subject_id", "The subject_id field is required"));
    };

    let subject = match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Err(field_error("subject_id", "The selected subject_id is invalid")),
        Err(e) => return Err(storage_error(e, "Failed to verify subject")),
    };
    if !user.is_admin() && subject.tutor_id != Some(user.id) {
        return Err(forbidden("Only the subject's tutor can upload materials"));
    }

    Ok(NewMaterial {
        subject_id,
        uploaded_by: user.id,
        title,
        description: form.text("description").map(str::to_string),
        original_name: file.original_name.clone(),
        stored_name: file.stored_name.clone(),
        file_size: file.size as i64,
        mime_type: file.mime_type.clone(),
    })
}
