use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::UpdateClassRequest, responses::ClassResponse},
};
use crate::services::{conflict, not_found, storage_error, validation_failed};
use crate::utils::validate::Validator;

pub async fn update_class(
    service: &ClassService,
    class_id: i64,
    mut update_data: UpdateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut validator = Validator::new();
    if let Some(name) = update_data.name.as_mut() {
        *name = name.trim().to_string();
        validator.required("name", name).max_len("name", name, 100);
    }
    if let Some(fee) = update_data.monthly_fee {
        validator.non_negative("monthly_fee", fee);
    }
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassResponse { class },
            "Class updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(TutorHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::ClassAlreadyExists,
            "A class with this name already exists",
        )),
        Err(e) => Ok(storage_error(e, "Class update failed")),
    }
}
