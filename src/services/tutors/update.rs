use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TutorService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    tutors::{requests::UpdateTutorRequest, responses::TutorResponse},
};
use crate::services::{
    conflict, evict_cached_user, not_found, storage_error, uploads, validation_failed,
};
use crate::utils::validate::Validator;

pub async fn update_tutor(
    service: &TutorService,
    id: i64,
    req: UpdateTutorRequest,
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
    if let Some(base_salary) = req.base_salary {
        validator.non_negative("base_salary", base_salary);
    }
    if let Some(rate) = req.per_session_rate {
        validator.non_negative("per_session_rate", rate);
    }
    validator.phone("phone", req.phone.as_deref());
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    match storage.update_tutor(id, req).await {
        Ok(Some(tutor)) => {
            evict_cached_user(request, id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                TutorResponse { tutor },
                "Tutor updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::TutorNotFound, "Tutor not found")),
        Err(TutorHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )),
        Err(e) => Ok(storage_error(e, "Tutor update failed")),
    }
}

pub async fn delete_tutor(
    service: &TutorService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let photo = match storage.get_tutor_profile(id).await {
        Ok(profile) => profile.and_then(|p| p.photo_path),
        Err(e) => return Ok(storage_error(e, "Failed to load tutor")),
    };

    match storage.delete_tutor(id).await {
        Ok(true) => {
            evict_cached_user(request, id).await;
            if let Some(photo) = photo {
                uploads::remove_relative(&photo);
            }
            info!("Tutor {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Tutor deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TutorNotFound, "Tutor not found")),
        Err(e) => Ok(storage_error(e, "Tutor deletion failed")),
    }
}
