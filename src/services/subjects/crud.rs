use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::{
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::{SubjectListResponse, SubjectResponse},
    },
    users::entities::UserRole,
};
use crate::services::{conflict, field_error, not_found, storage_error, validation_failed};
use crate::storage::Storage;
use crate::utils::validate::Validator;

/// 任课教师必须是教师账号；返回 Some 表示校验失败的响应
async fn check_tutor(storage: &Arc<dyn Storage>, tutor_id: Option<i64>) -> Option<HttpResponse> {
    let tutor_id = tutor_id?;
    match storage.get_user_by_id(tutor_id).await {
        Ok(Some(user)) if user.role == UserRole::Tutor => None,
        Ok(_) => Some(field_error("tutor_id", "The selected tutor_id is not a tutor")),
        Err(e) => Some(storage_error(e, "Failed to verify tutor")),
    }
}

fn subject_exists() -> HttpResponse {
    conflict(
        ErrorCode::SubjectAlreadyExists,
        "This class already has a subject with that name",
    )
}

pub async fn list_subjects(
    service: &SubjectService,
    query: SubjectListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_subjects(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectListResponse { items },
            "Subject list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve subject list")),
    }
}

pub async fn create_subject(
    service: &SubjectService,
    mut req: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.name = req.name.trim().to_string();
    let mut validator = Validator::new();
    validator
        .required("name", &req.name)
        .max_len("name", &req.name, 100);
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    match storage.get_class_by_id(req.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(field_error("class_id", "The selected class_id is invalid")),
        Err(e) => return Ok(storage_error(e, "Failed to verify class")),
    }
    if let Some(resp) = check_tutor(&storage, req.tutor_id).await {
        return Ok(resp);
    }

    match storage.create_subject(req).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            SubjectResponse { subject },
            "Subject created successfully",
        ))),
        Err(TutorHubError::Conflict(_)) => Ok(subject_exists()),
        Err(e) => Ok(storage_error(e, "Subject creation failed")),
    }
}

pub async fn get_subject(
    service: &SubjectService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_subject_by_id(id).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectResponse { subject },
            "Subject retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error(e, "Failed to retrieve subject")),
    }
}

pub async fn update_subject(
    service: &SubjectService,
    id: i64,
    mut req: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut validator = Validator::new();
    if let Some(name) = req.name.as_mut() {
        *name = name.trim().to_string();
        validator.required("name", name).max_len("name", name, 100);
    }
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    if let Some(resp) = check_tutor(&storage, req.tutor_id).await {
        return Ok(resp);
    }

    match storage.update_subject(id, req).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectResponse { subject },
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(TutorHubError::Conflict(_)) => Ok(subject_exists()),
        Err(e) => Ok(storage_error(e, "Subject update failed")),
    }
}

pub async fn delete_subject(
    service: &SubjectService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_subject(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Subject deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error(e, "Subject deletion failed")),
    }
}
