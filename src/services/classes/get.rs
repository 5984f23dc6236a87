use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::ClassListQuery, responses::ClassResponse},
};
use crate::services::{not_found, storage_error};

pub async fn list_classes(
    service: &ClassService,
    query: ClassListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_classes_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve class list")),
    }
}

pub async fn get_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassResponse { class },
            "Class information retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error(e, "Failed to get class information")),
    }
}
