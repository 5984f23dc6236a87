use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::CreateClassRequest, responses::ClassResponse},
};
use crate::services::{conflict, storage_error, validation_failed};
use crate::utils::validate::Validator;

pub async fn create_class(
    service: &ClassService,
    mut class_data: CreateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    class_data.name = class_data.name.trim().to_string();

    let mut validator = Validator::new();
    validator
        .required("name", &class_data.name)
        .max_len("name", &class_data.name, 100)
        .non_negative("monthly_fee", class_data.monthly_fee);
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;
    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created", class.name);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ClassResponse { class },
                "Class created successfully",
            )))
        }
        Err(TutorHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::ClassAlreadyExists,
            "A class with this name already exists",
        )),
        Err(e) => Ok(storage_error(e, "Class creation failed")),
    }
}
