use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::UpdateStudentRequest, responses::StudentResponse},
};
use crate::services::{
    conflict, evict_cached_user, not_found, storage_error, uploads, validation_failed,
};
use crate::utils::validate::Validator;

pub async fn update_student(
    service: &StudentService,
    id: i64,
    req: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut validator = Validator::new();
    if let Some(email) = &req.email {
        validator.email("email", email);
    }
    if let Some(full_name) = &req.full_name {
        validator
            .required("full_name", full_name)
            .max_len("full_name", full_name, 100);
    }
    validator
        .phone("phone", req.phone.as_deref())
        .phone("guardian_phone", req.guardian_phone.as_deref());
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    match storage.update_student(id, req).await {
        Ok(Some(student)) => {
            evict_cached_user(request, id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse { student },
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(TutorHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )),
        Err(e) => Ok(storage_error(e, "Student update failed")),
    }
}

pub async fn delete_student(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 账号删除后档案随之级联，先记下头像路径
    let photo = match storage.get_student_profile(id).await {
        Ok(profile) => profile.and_then(|p| p.photo_path),
        Err(e) => return Ok(storage_error(e, "Failed to load student")),
    };

    match storage.delete_student(id).await {
        Ok(true) => {
            evict_cached_user(request, id).await;
            if let Some(photo) = photo {
                uploads::remove_relative(&photo);
            }
            info!("Student {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error(e, "Student deletion failed")),
    }
}
